//! Core traits for the personalized pipeline.
//!
//! Filters decide which catalog items are eligible at all; score rules each
//! contribute one additive adjustment to an eligible item's score.

use anyhow::Result;
use domain::MenuItem;
use sources::{Candidate, UserContext};

/// Core trait for filtering candidates.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared across threads
/// - Filters take ownership of the Vec<Candidate> and return a filtered Vec
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    fn apply(&self, candidates: Vec<Candidate>, context: &UserContext) -> Result<Vec<Candidate>>;
}

/// One weighted term of the personalized score.
///
/// Rules are pure functions of the item and the diner's context, so the
/// scoring pipeline can run them from many threads at once.
pub trait ScoreRule: Send + Sync {
    fn name(&self) -> &str;

    /// Signed adjustment this rule contributes to the item's score
    fn score(&self, item: &MenuItem, context: &UserContext) -> i32;
}
