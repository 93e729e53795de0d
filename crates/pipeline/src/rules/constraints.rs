//! Rules driven by the diner's saved preferences.

use crate::traits::ScoreRule;
use domain::MenuItem;
use sources::UserContext;

/// Penalises each step between the preferred and actual spice level.
pub struct SpiceDistanceRule {
    penalty_per_step: i32,
}

impl SpiceDistanceRule {
    pub fn new(penalty_per_step: i32) -> Self {
        Self { penalty_per_step }
    }
}

impl Default for SpiceDistanceRule {
    fn default() -> Self {
        Self::new(5)
    }
}

impl ScoreRule for SpiceDistanceRule {
    fn name(&self) -> &str {
        "SpiceDistanceRule"
    }

    fn score(&self, item: &MenuItem, context: &UserContext) -> i32 {
        -(context.spice_level.distance(item.spice_level) as i32) * self.penalty_per_step
    }
}

/// Heavily penalises each active dietary restriction the item breaks.
pub struct DietaryRule {
    penalty: i32,
}

impl DietaryRule {
    pub fn new(penalty: i32) -> Self {
        Self { penalty }
    }
}

impl Default for DietaryRule {
    fn default() -> Self {
        Self::new(100)
    }
}

impl ScoreRule for DietaryRule {
    fn name(&self) -> &str {
        "DietaryRule"
    }

    fn score(&self, item: &MenuItem, context: &UserContext) -> i32 {
        -(context.violated_restrictions(item) as i32) * self.penalty
    }
}

/// Penalises each disliked ingredient the item contains.
pub struct DislikedIngredientRule {
    penalty: i32,
}

impl DislikedIngredientRule {
    pub fn new(penalty: i32) -> Self {
        Self { penalty }
    }
}

impl Default for DislikedIngredientRule {
    fn default() -> Self {
        Self::new(50)
    }
}

impl ScoreRule for DislikedIngredientRule {
    fn name(&self) -> &str {
        "DislikedIngredientRule"
    }

    fn score(&self, item: &MenuItem, context: &UserContext) -> i32 {
        -(context.disliked_ingredients_in(item) as i32) * self.penalty
    }
}
