//! Rules driven by the diner's order history.

use crate::traits::ScoreRule;
use domain::MenuItem;
use sources::UserContext;

/// Rewards items from the diner's most-ordered categories.
pub struct FavoriteCategoryRule {
    bonus: i32,
}

impl FavoriteCategoryRule {
    pub fn new(bonus: i32) -> Self {
        Self { bonus }
    }
}

impl Default for FavoriteCategoryRule {
    fn default() -> Self {
        Self::new(30)
    }
}

impl ScoreRule for FavoriteCategoryRule {
    fn name(&self) -> &str {
        "FavoriteCategoryRule"
    }

    fn score(&self, item: &MenuItem, context: &UserContext) -> i32 {
        if context.loves_category(&item.category) {
            self.bonus
        } else {
            0
        }
    }
}

/// Promotes variety: each prior order of an item costs it points, while
/// items never ordered get a bonus.
pub struct NoveltyRule {
    penalty_per_order: i32,
    untried_bonus: i32,
}

impl NoveltyRule {
    pub fn new(penalty_per_order: i32, untried_bonus: i32) -> Self {
        Self {
            penalty_per_order,
            untried_bonus,
        }
    }
}

impl Default for NoveltyRule {
    fn default() -> Self {
        Self::new(10, 15)
    }
}

impl ScoreRule for NoveltyRule {
    fn name(&self) -> &str {
        "NoveltyRule"
    }

    fn score(&self, item: &MenuItem, context: &UserContext) -> i32 {
        match context.times_ordered(&item.name) {
            0 => self.untried_bonus,
            n => -(n as i32) * self.penalty_per_order,
        }
    }
}
