//! The FilterPipeline chains eligibility filters.

use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, UserContext};

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(AvailableFilter)
///     .add_filter(ExcludeItemsFilter::new(["Mogodu Special"]));
///
/// let eligible = pipeline.apply(candidates, &context)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence to the candidates.
    pub fn apply(&self, candidates: Vec<Candidate>, context: &UserContext) -> Result<Vec<Candidate>> {
        let mut current = candidates;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, context)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{AvailableFilter, ExcludeItemsFilter};
    use domain::MenuCatalog;

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        let candidates = Candidate::all(&MenuCatalog::smokeville());

        let filtered = pipeline.apply(candidates, &UserContext::anonymous()).unwrap();
        assert_eq!(filtered.len(), 10);
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_filters_run_in_sequence() {
        let mut candidates = Candidate::all(&MenuCatalog::smokeville());
        candidates[0].item.available = false;

        let pipeline = FilterPipeline::new()
            .add_filter(AvailableFilter)
            .add_filter(ExcludeItemsFilter::new(["Mogodu Special"]));

        let filtered = pipeline.apply(candidates, &UserContext::anonymous()).unwrap();
        assert_eq!(pipeline.len(), 2);
        assert_eq!(filtered.len(), 8);
        assert!(filtered.iter().all(|c| c.item.name != "Smoked Full Chicken"));
        assert!(filtered.iter().all(|c| c.item.name != "Mogodu Special"));
    }
}
