//! # Sources Crate
//!
//! Candidate sources for menu recommendations, plus the per-diner preference
//! summary the personalized scorer works from.
//!
//! ## Components
//!
//! ### User Context
//! Summarises a diner's recent orders (top categories, favourite items,
//! per-item order counts) together with their saved spice level, dietary
//! restrictions and disliked ingredients.
//!
//! ### Trending Source
//! Ranks menu items by how often they appear in the most recent orders across
//! all diners, falling back to popular items when there is no history.
//!
//! ### Complementary and Similar Sources
//! Item-to-item suggestions from a hand-authored pairing table, and from
//! shared categories and tags.
//!
//! ### Time-Based Source
//! Monday and late-night specials.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{build_user_context, TrendingSource, DEFAULT_HISTORY_WINDOW};
//! use domain::MenuCatalog;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(MenuCatalog::smokeville());
//! let context = build_user_context(Some(user_id), &orders, &preferences, DEFAULT_HISTORY_WINDOW);
//!
//! let trending = TrendingSource::new(catalog.clone()).get_candidates(&recent_orders, 6);
//! ```

pub mod pairing;
pub mod time_based;
pub mod trending;
pub mod types;
pub mod user_context;

pub use pairing::{ComplementarySource, SimilarSource};
pub use time_based::TimeBasedSource;
pub use trending::TrendingSource;
pub use types::{Candidate, CandidateSource, Recommendation, UserContext};
pub use user_context::{build_user_context, DEFAULT_HISTORY_WINDOW};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use domain::{MenuCatalog, Order, OrderItem, OrderStatus, OrderType};
    use rust_decimal::Decimal;

    /// One unit of a menu item, priced and categorised from the house menu
    pub fn line(name: &str) -> OrderItem {
        let catalog = MenuCatalog::smokeville();
        let (price, category) = catalog
            .get(name)
            .map(|item| (item.price, item.category.clone()))
            .unwrap_or((Decimal::from(50), "other".to_string()));
        OrderItem {
            name: name.to_string(),
            price,
            quantity: 1,
            category,
        }
    }

    pub fn order(items: Vec<OrderItem>) -> Order {
        let now = Utc::now();
        let subtotal: Decimal = items.iter().map(OrderItem::line_total).sum();
        Order {
            id: String::new(),
            user_id: "u1".to_string(),
            user_email: "thandi@example.com".to_string(),
            user_name: "Thandi".to_string(),
            items,
            order_type: OrderType::Takeaway,
            delivery_address: None,
            delivery_instructions: None,
            table_number: None,
            phone_number: None,
            subtotal,
            delivery_fee: Decimal::ZERO,
            total: subtotal,
            status: OrderStatus::Completed,
            payment_method: None,
            payment_intent_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::MenuCatalog;

    #[test]
    fn test_recommendation_from_item() {
        let catalog = MenuCatalog::smokeville();
        let ribs = catalog.get("BBQ Ribs Platter").unwrap();
        let recommendation =
            Recommendation::from_item(ribs, 90, "Pairs well together", CandidateSource::Complementary);

        assert_eq!(recommendation.name, "BBQ Ribs Platter");
        assert_eq!(recommendation.category, "beef");
        assert_eq!(recommendation.tags.len(), 4);
        assert_eq!(recommendation.source, CandidateSource::Complementary);
    }

    #[test]
    fn test_candidates_follow_catalog_order() {
        let catalog = MenuCatalog::smokeville();
        let candidates = Candidate::all(&catalog);
        assert_eq!(candidates.len(), catalog.len());
        assert_eq!(candidates[2].position, 2);
        assert_eq!(candidates[2].item.name, "Margherita Pizza");
    }

    #[test]
    fn test_anonymous_context() {
        let context = UserContext::anonymous();
        assert!(context.user_id.is_none());
        assert_eq!(context.times_ordered("8 Smoked Wings"), 0);
        assert!(!context.loves_category("pizza"));
    }
}
