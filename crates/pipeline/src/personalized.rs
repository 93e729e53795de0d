//! Personalized recommendations: filter the catalog, score what is left,
//! rank and explain.

use crate::filter_pipeline::FilterPipeline;
use crate::filters::AvailableFilter;
use crate::reasons::explain;
use crate::scoring::ScoringPipeline;
use anyhow::Result;
use sources::{Candidate, CandidateSource, Recommendation, UserContext};
use tracing::{debug, instrument};

pub const DEFAULT_RECOMMENDATION_COUNT: usize = 6;

pub struct PersonalizedScorer {
    filters: FilterPipeline,
    scoring: ScoringPipeline,
}

impl PersonalizedScorer {
    pub fn new(filters: FilterPipeline, scoring: ScoringPipeline) -> Self {
        Self { filters, scoring }
    }

    /// Available items only, scored with the house weights
    pub fn house() -> Self {
        Self::new(
            FilterPipeline::new().add_filter(AvailableFilter),
            ScoringPipeline::house(),
        )
    }

    pub fn with_filters(mut self, filters: FilterPipeline) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringPipeline) -> Self {
        self.scoring = scoring;
        self
    }

    /// Rank the candidates for this diner and keep the best `count`.
    #[instrument(skip(self, candidates, context), fields(user = ?context.user_id))]
    pub fn recommend(
        &self,
        candidates: Vec<Candidate>,
        context: &UserContext,
        count: usize,
    ) -> Result<Vec<Recommendation>> {
        let eligible = self.filters.apply(candidates, context)?;
        let scored = self.scoring.score_all(&eligible, context);
        let ranked = self.scoring.rank(scored);

        debug!("Ranked {} eligible items, returning {}", ranked.len(), count.min(ranked.len()));

        Ok(ranked
            .into_iter()
            .take(count)
            .map(|scored| {
                Recommendation::from_item(
                    scored.item(),
                    scored.score,
                    explain(scored.item(), context),
                    CandidateSource::Personalized,
                )
            })
            .collect())
    }
}

impl Default for PersonalizedScorer {
    fn default() -> Self {
        Self::house()
    }
}
