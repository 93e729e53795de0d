//! Filter to drop items the kitchen has taken off the menu.

use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, UserContext};

/// Removes candidates marked unavailable.
pub struct AvailableFilter;

impl Filter for AvailableFilter {
    fn name(&self) -> &str {
        "AvailableFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, _context: &UserContext) -> Result<Vec<Candidate>> {
        Ok(candidates
            .into_iter()
            .filter(|candidate| candidate.item.available)
            .collect())
    }
}
