//! Types shared by the candidate sources and the scoring pipeline.

use domain::{DietaryRestriction, MenuCatalog, MenuItem, SpiceLevel, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a recommendation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateSource {
    /// Scored against the diner's preference summary
    Personalized,
    /// Ranked by recent order frequency
    Trending,
    /// Popular-tag fallback when there is no order history
    Popular,
    /// Hand-authored pairing table
    Complementary,
    /// Same category or shared tags
    Similar,
    /// Day-of-week and hour specials
    TimeBased,
}

/// A catalog item entering the personalized pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Position in the catalog, used to break ties
    pub position: usize,
    pub item: MenuItem,
}

impl Candidate {
    /// Every catalog item, in catalog order
    pub fn all(catalog: &MenuCatalog) -> Vec<Candidate> {
        catalog
            .items()
            .iter()
            .enumerate()
            .map(|(position, item)| Candidate {
                position,
                item: item.clone(),
            })
            .collect()
    }
}

/// A ranked menu item returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub score: i32,
    pub reason: String,
    pub source: CandidateSource,
}

impl Recommendation {
    pub fn from_item(
        item: &MenuItem,
        score: i32,
        reason: impl Into<String>,
        source: CandidateSource,
    ) -> Self {
        Self {
            name: item.name.clone(),
            category: item.category.clone(),
            price: item.price,
            image: item.image.clone(),
            tags: item.tags.clone(),
            score,
            reason: reason.into(),
            source,
        }
    }
}

/// Preference summary for one diner, derived from recent orders plus the
/// preferences saved on their profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserContext {
    pub user_id: Option<UserId>,

    /// Number of orders the summary was built from
    pub orders_considered: usize,

    /// Up to three categories, most ordered first
    pub top_categories: Vec<String>,

    /// Up to five item names, most ordered first
    pub favorite_items: Vec<String>,

    /// item name -> number of orders containing it
    pub item_order_counts: HashMap<String, u32>,

    pub spice_level: SpiceLevel,
    pub dietary_restrictions: Vec<DietaryRestriction>,
    pub disliked_ingredients: Vec<String>,
}

impl UserContext {
    /// Context for a diner with no history and no saved preferences
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn loves_category(&self, category: &str) -> bool {
        self.top_categories.iter().any(|c| c == category)
    }

    pub fn times_ordered(&self, item_name: &str) -> u32 {
        self.item_order_counts.get(item_name).copied().unwrap_or(0)
    }

    /// Restrictions the item does not satisfy
    pub fn violated_restrictions(&self, item: &MenuItem) -> usize {
        self.dietary_restrictions
            .iter()
            .filter(|restriction| !restriction.is_satisfied_by(item))
            .count()
    }

    /// Disliked ingredients the item contains
    pub fn disliked_ingredients_in(&self, item: &MenuItem) -> usize {
        self.disliked_ingredients
            .iter()
            .filter(|ingredient| item.contains_ingredient(ingredient))
            .count()
    }
}
