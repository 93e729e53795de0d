//! Additive scoring over eligible candidates.
//!
//! Every candidate starts from a base score, each rule adds its signed
//! adjustment, and the total is clamped at zero.

use crate::rules::{
    DietaryRule, DislikedIngredientRule, FavoriteCategoryRule, NoveltyRule, SpiceDistanceRule,
    TagBonusRule,
};
use crate::traits::ScoreRule;
use domain::MenuItem;
use rayon::prelude::*;
use sources::{Candidate, UserContext};
use std::cmp::Ordering;

pub const BASE_SCORE: i32 = 50;

/// A candidate together with its final score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: i32,

    /// False when the item breaks at least one dietary restriction
    pub compliant: bool,
}

impl ScoredCandidate {
    pub fn item(&self) -> &MenuItem {
        &self.candidate.item
    }
}

/// Sums the contributions of a list of score rules.
///
/// ## Usage
/// ```ignore
/// let scoring = ScoringPipeline::new(BASE_SCORE)
///     .add_rule(FavoriteCategoryRule::default())
///     .add_rule(DietaryRule::default());
///
/// let ranked = scoring.rank(scoring.score_all(&candidates, &context));
/// ```
pub struct ScoringPipeline {
    base: i32,
    rules: Vec<Box<dyn ScoreRule>>,
}

impl ScoringPipeline {
    pub fn new(base: i32) -> Self {
        Self {
            base,
            rules: Vec::new(),
        }
    }

    /// The house weighting used for personalized recommendations
    pub fn house() -> Self {
        Self::new(BASE_SCORE)
            .add_rule(FavoriteCategoryRule::default())
            .add_rule(NoveltyRule::default())
            .add_rule(TagBonusRule::popular())
            .add_rule(SpiceDistanceRule::default())
            .add_rule(DietaryRule::default())
            .add_rule(DislikedIngredientRule::default())
            .add_rule(TagBonusRule::premium())
    }

    /// Add a rule to the pipeline (builder pattern).
    pub fn add_rule(mut self, rule: impl ScoreRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Score one item. Never negative.
    pub fn score(&self, item: &MenuItem, context: &UserContext) -> i32 {
        let total = self
            .rules
            .iter()
            .fold(self.base, |acc, rule| acc + rule.score(item, context));
        total.max(0)
    }

    /// Score all candidates in parallel, preserving input order.
    pub fn score_all(&self, candidates: &[Candidate], context: &UserContext) -> Vec<ScoredCandidate> {
        candidates
            .par_iter()
            .map(|candidate| ScoredCandidate {
                score: self.score(&candidate.item, context),
                compliant: context.violated_restrictions(&candidate.item) == 0,
                candidate: candidate.clone(),
            })
            .collect()
    }

    /// Order scored candidates best first.
    ///
    /// Items that satisfy every dietary restriction always rank ahead of
    /// items that break one, whatever their scores. Within each group the
    /// higher score wins and ties fall back to catalog order.
    pub fn rank(&self, mut scored: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
        scored.sort_by(compare_ranked);
        scored
    }
}

impl Default for ScoringPipeline {
    fn default() -> Self {
        Self::house()
    }
}

fn compare_ranked(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.compliant
        .cmp(&a.compliant)
        .then_with(|| b.score.cmp(&a.score))
        .then_with(|| a.candidate.position.cmp(&b.candidate.position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{DietaryRestriction, MenuCatalog, SpiceLevel};

    #[test]
    fn test_anonymous_scores() {
        let catalog = MenuCatalog::smokeville();
        let scoring = ScoringPipeline::house();
        let context = UserContext::anonymous();

        // 50 base + 15 untried + 10 popular, mild is one step from medium
        assert_eq!(scoring.score(catalog.get("Smoked Full Chicken").unwrap(), &context), 70);
        // 50 + 15 + 5 premium, medium spice
        assert_eq!(scoring.score(catalog.get("BBQ Ribs Platter").unwrap(), &context), 70);
        // 50 + 15 + 10 popular, medium spice
        assert_eq!(scoring.score(catalog.get("8 Smoked Wings").unwrap(), &context), 75);
    }

    #[test]
    fn test_score_clamped_at_zero() {
        let catalog = MenuCatalog::smokeville();
        let scoring = ScoringPipeline::house();
        let mut context = UserContext::anonymous();
        context.dietary_restrictions = vec![DietaryRestriction::Vegan, DietaryRestriction::Halal];
        context.disliked_ingredients = vec!["beef".to_string(), "ribs".to_string()];

        assert_eq!(scoring.score(catalog.get("BBQ Ribs Platter").unwrap(), &context), 0);
    }

    #[test]
    fn test_empty_pipeline_scores_base() {
        let catalog = MenuCatalog::smokeville();
        let scoring = ScoringPipeline::new(BASE_SCORE);
        let item = catalog.get("Mogodu Special").unwrap();
        assert_eq!(scoring.score(item, &UserContext::anonymous()), BASE_SCORE);
    }

    #[test]
    fn test_rank_puts_compliant_first() {
        let catalog = MenuCatalog::smokeville();
        let scoring = ScoringPipeline::house();
        let mut context = UserContext::anonymous();
        context.dietary_restrictions = vec![DietaryRestriction::Vegetarian];
        context.spice_level = SpiceLevel::Mild;

        let ranked = scoring.rank(scoring.score_all(&Candidate::all(&catalog), &context));

        let names: Vec<&str> = ranked.iter().take(2).map(|s| s.item().name.as_str()).collect();
        assert!(names.contains(&"Margherita Pizza"));
        assert!(names.contains(&"Veggie Supreme Pizza"));
        assert!(ranked[2..].iter().all(|s| !s.compliant));
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog = MenuCatalog::smokeville();
        let scoring = ScoringPipeline::new(BASE_SCORE);
        let ranked = scoring.rank(scoring.score_all(&Candidate::all(&catalog), &UserContext::anonymous()));

        let positions: Vec<usize> = ranked.iter().map(|s| s.candidate.position).collect();
        assert_eq!(positions, (0..catalog.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_rule_names() {
        let names = ScoringPipeline::house().rule_names().len();
        assert_eq!(names, 7);
    }
}
