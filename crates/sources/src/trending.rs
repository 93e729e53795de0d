//! Trending Source - what everyone has been ordering
//!
//! Counts line-item occurrences across the most recent orders from all
//! diners and ranks catalog items by that frequency. When there is nothing
//! to rank, the popular-tagged items stand in.

use crate::types::{CandidateSource, Recommendation};
use domain::{MenuCatalog, Order};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Number of recent orders the trending count looks at
pub const DEFAULT_TRENDING_WINDOW: usize = 50;

pub const TRENDING_SCORE: i32 = 100;
pub const POPULAR_SCORE: i32 = 80;

#[derive(Clone)]
pub struct TrendingSource {
    catalog: Arc<MenuCatalog>,

    /// How many recent orders to count over
    window: usize,
}

impl TrendingSource {
    pub fn new(catalog: Arc<MenuCatalog>) -> Self {
        Self {
            catalog,
            window: DEFAULT_TRENDING_WINDOW,
        }
    }

    /// Configure the order window (default: 50)
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Rank catalog items by how often they appear in `orders` (newest
    /// first). Ties keep catalog order.
    #[instrument(skip(self, orders), fields(orders = orders.len()))]
    pub fn get_candidates(&self, orders: &[Order], limit: usize) -> Vec<Recommendation> {
        let recent = &orders[..orders.len().min(self.window)];
        let counts = count_line_items(recent);

        let mut ranked: Vec<(usize, u32)> = self
            .catalog
            .items()
            .iter()
            .enumerate()
            .filter_map(|(pos, item)| counts.get(&item.name).map(|&count| (pos, count)))
            .collect();

        if ranked.is_empty() {
            debug!("No trending items in {} orders, using popular items", recent.len());
            return self.popular(limit);
        }

        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(limit);

        ranked
            .into_iter()
            .map(|(pos, _)| {
                Recommendation::from_item(
                    &self.catalog.items()[pos],
                    TRENDING_SCORE,
                    "Trending now",
                    CandidateSource::Trending,
                )
            })
            .collect()
    }

    /// Popular-tagged items in catalog order
    pub fn popular(&self, limit: usize) -> Vec<Recommendation> {
        self.catalog
            .by_tag("popular")
            .into_iter()
            .take(limit)
            .map(|item| {
                Recommendation::from_item(item, POPULAR_SCORE, "Popular choice", CandidateSource::Popular)
            })
            .collect()
    }
}

/// Count every order line by item name
fn count_line_items(orders: &[Order]) -> HashMap<String, u32> {
    orders
        .par_iter()
        .fold(
            HashMap::new,
            |mut local_counts: HashMap<String, u32>, order| {
                for line in &order.items {
                    *local_counts.entry(line.name.clone()).or_insert(0) += 1;
                }
                local_counts
            },
        )
        .reduce(HashMap::new, |mut acc, local_counts| {
            for (name, count) in local_counts {
                *acc.entry(name).or_insert(0) += count;
            }
            acc
        })
}
