//! Item-to-item sources: complementary pairings and similar items.
//!
//! Both walk the catalog front to back, so results come out in catalog
//! order rather than in the order the pairing table lists them.

use crate::types::{CandidateSource, Recommendation};
use domain::MenuCatalog;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

pub const COMPLEMENTARY_SCORE: i32 = 90;
pub const SIMILAR_SCORE: i32 = 85;

pub const DEFAULT_COMPLEMENTARY_COUNT: usize = 3;
pub const DEFAULT_SIMILAR_COUNT: usize = 4;

/// The house pairing table, keyed by item name
pub fn default_pairings() -> HashMap<String, Vec<String>> {
    [
        ("Smoked Full Chicken", ["8 Smoked Wings", "Veggie Supreme Pizza"]),
        ("BBQ Ribs Platter", ["Beef Burger Deluxe", "Mixed Grill Platter"]),
        ("Margherita Pizza", ["Veggie Supreme Pizza", "Peri-Peri Chicken Pizza"]),
        ("Peri-Peri Chicken Pizza", ["8 Smoked Wings", "Smoked Full Chicken"]),
    ]
    .into_iter()
    .map(|(item, pairs)| {
        (
            item.to_string(),
            pairs.iter().map(|p| p.to_string()).collect(),
        )
    })
    .collect()
}

/// Items that go well with a given item
#[derive(Clone)]
pub struct ComplementarySource {
    catalog: Arc<MenuCatalog>,
    pairings: Arc<HashMap<String, Vec<String>>>,
}

impl ComplementarySource {
    pub fn new(catalog: Arc<MenuCatalog>) -> Self {
        Self {
            catalog,
            pairings: Arc::new(default_pairings()),
        }
    }

    /// Replace the pairing table
    pub fn with_pairings(mut self, pairings: HashMap<String, Vec<String>>) -> Self {
        self.pairings = Arc::new(pairings);
        self
    }

    /// Items with no entry in the table get no pairings
    #[instrument(skip(self))]
    pub fn get_candidates(&self, item_name: &str, limit: usize) -> Vec<Recommendation> {
        let Some(complements) = self.pairings.get(item_name) else {
            debug!("No pairings for {}", item_name);
            return Vec::new();
        };

        self.catalog
            .items()
            .iter()
            .filter(|item| complements.contains(&item.name))
            .take(limit)
            .map(|item| {
                Recommendation::from_item(
                    item,
                    COMPLEMENTARY_SCORE,
                    "Pairs well together",
                    CandidateSource::Complementary,
                )
            })
            .collect()
    }
}

/// Items sharing a category or at least one tag with a given item
#[derive(Clone)]
pub struct SimilarSource {
    catalog: Arc<MenuCatalog>,
}

impl SimilarSource {
    pub fn new(catalog: Arc<MenuCatalog>) -> Self {
        Self { catalog }
    }

    /// Unknown items have no similar items
    #[instrument(skip(self))]
    pub fn get_candidates(&self, item_name: &str, limit: usize) -> Vec<Recommendation> {
        let Some(current) = self.catalog.get(item_name) else {
            debug!("{} is not on the menu", item_name);
            return Vec::new();
        };

        self.catalog
            .items()
            .iter()
            .filter(|item| {
                item.name != current.name
                    && (item.category == current.category || item.shares_tag_with(current))
            })
            .take(limit)
            .map(|item| {
                Recommendation::from_item(
                    item,
                    SIMILAR_SCORE,
                    "Similar to your choice",
                    CandidateSource::Similar,
                )
            })
            .collect()
    }
}
