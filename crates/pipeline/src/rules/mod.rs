//! Score rules for the personalized pipeline.
//!
//! Each rule owns one term of the score and its weight:
//!
//! | Rule                     | Effect                                         |
//! |--------------------------|------------------------------------------------|
//! | `FavoriteCategoryRule`   | +30 if the category is in the diner's top 3    |
//! | `NoveltyRule`            | -10 per prior order, or +15 if never ordered   |
//! | `TagBonusRule`           | +10 `popular`, +5 `premium`                    |
//! | `SpiceDistanceRule`      | -5 per step from the preferred spice level     |
//! | `DietaryRule`            | -100 per violated dietary restriction          |
//! | `DislikedIngredientRule` | -50 per disliked ingredient present            |

pub mod constraints;
pub mod history;
pub mod tags;

pub use constraints::{DietaryRule, DislikedIngredientRule, SpiceDistanceRule};
pub use history::{FavoriteCategoryRule, NoveltyRule};
pub use tags::TagBonusRule;
