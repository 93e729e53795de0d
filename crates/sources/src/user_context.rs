//! Build a UserContext from order history.
//!
//! The summary is recomputed on every request; nothing here is cached or
//! written back to the store.

use crate::types::UserContext;
use domain::{FoodPreferences, Order, UserId};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Number of recent orders the preference summary looks at
pub const DEFAULT_HISTORY_WINDOW: usize = 20;

const TOP_CATEGORIES: usize = 3;
const FAVORITE_ITEMS: usize = 5;

/// Build a UserContext from a diner's orders (newest first) and saved
/// preferences.
///
/// Only the first `window` orders are considered. Categories are counted
/// per order line, so two lines of pizza in one order count twice.
pub fn build_user_context(
    user_id: Option<UserId>,
    orders: &[Order],
    preferences: &FoodPreferences,
    window: usize,
) -> UserContext {
    let recent = &orders[..orders.len().min(window)];

    let mut context = UserContext {
        user_id,
        orders_considered: recent.len(),
        spice_level: preferences.spice_level,
        dietary_restrictions: preferences.dietary_restrictions.clone(),
        disliked_ingredients: preferences.disliked_ingredients.clone(),
        ..Default::default()
    };

    if recent.is_empty() {
        return context;
    }

    let mut category_counts = Tally::default();
    let mut item_counts = Tally::default();
    for order in recent {
        for line in &order.items {
            if !line.category.is_empty() {
                category_counts.add(&line.category);
            }
            item_counts.add(&line.name);
        }
    }

    context.top_categories = category_counts.top(TOP_CATEGORIES);
    context.favorite_items = item_counts.top(FAVORITE_ITEMS);
    context.item_order_counts = count_orders_per_item(recent);

    debug!(
        "Built context from {} orders: top categories {:?}",
        recent.len(),
        context.top_categories
    );
    context
}

/// Number of orders each item appears in, at most once per order
fn count_orders_per_item(orders: &[Order]) -> HashMap<String, u32> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for order in orders {
        let distinct: HashSet<&str> = order.items.iter().map(|i| i.name.as_str()).collect();
        for name in distinct {
            *counts.entry(name.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// Counter that remembers first-seen order so ties rank predictably
#[derive(Default)]
struct Tally {
    counts: Vec<(String, u32)>,
    positions: HashMap<String, usize>,
}

impl Tally {
    fn add(&mut self, key: &str) {
        match self.positions.get(key) {
            Some(&pos) => self.counts[pos].1 += 1,
            None => {
                self.positions.insert(key.to_string(), self.counts.len());
                self.counts.push((key.to_string(), 1));
            }
        }
    }

    fn top(mut self, n: usize) -> Vec<String> {
        // stable: ties keep first-seen order
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts.into_iter().take(n).map(|(key, _)| key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{line, order};
    use domain::{DietaryRestriction, SpiceLevel};

    #[test]
    fn test_empty_history() {
        let context = build_user_context(
            Some("u1".to_string()),
            &[],
            &FoodPreferences::default(),
            DEFAULT_HISTORY_WINDOW,
        );
        assert_eq!(context.orders_considered, 0);
        assert!(context.top_categories.is_empty());
        assert_eq!(context.spice_level, SpiceLevel::Medium);
    }

    #[test]
    fn test_top_categories_and_counts() {
        let orders = vec![
            order(vec![line("Margherita Pizza"), line("8 Smoked Wings")]),
            order(vec![line("Margherita Pizza"), line("Spicy Beef Pizza")]),
            order(vec![line("Beef Burger Deluxe")]),
            order(vec![line("Mogodu Special")]),
        ];

        let context = build_user_context(None, &orders, &FoodPreferences::default(), 20);

        assert_eq!(context.orders_considered, 4);
        assert_eq!(context.top_categories, vec!["pizza", "poultry", "burgers"]);
        assert_eq!(context.favorite_items[0], "Margherita Pizza");
        assert_eq!(context.times_ordered("Margherita Pizza"), 2);
        assert_eq!(context.times_ordered("Smoked Full Chicken"), 0);
    }

    #[test]
    fn test_item_counted_once_per_order() {
        let orders = vec![order(vec![line("8 Smoked Wings"), line("8 Smoked Wings")])];
        let context = build_user_context(None, &orders, &FoodPreferences::default(), 20);
        assert_eq!(context.times_ordered("8 Smoked Wings"), 1);
    }

    #[test]
    fn test_window_limits_history() {
        let orders = vec![order(vec![line("8 Smoked Wings")]); 30];
        let context = build_user_context(None, &orders, &FoodPreferences::default(), 20);
        assert_eq!(context.orders_considered, 20);
        assert_eq!(context.times_ordered("8 Smoked Wings"), 20);
    }

    #[test]
    fn test_saved_preferences_carried() {
        let preferences = FoodPreferences {
            spice_level: SpiceLevel::ExtraHot,
            dietary_restrictions: vec![DietaryRestriction::Vegetarian],
            disliked_ingredients: vec!["olives".to_string()],
        };
        let context = build_user_context(None, &[], &preferences, 20);
        assert_eq!(context.spice_level, SpiceLevel::ExtraHot);
        assert_eq!(context.dietary_restrictions, vec![DietaryRestriction::Vegetarian]);
        assert_eq!(context.disliked_ingredients, vec!["olives"]);
    }
}
