//! Admin dashboard figures.

use super::list;
use super::reviews::summarize;
use crate::config::ServiceConfig;
use crate::error::Result;
use chrono::{DateTime, Utc};
use domain::{Booking, BookingStatus, NewsletterSubscriber, Order, OrderStatus, Review};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use store::{collections, DocumentStore, Query};
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_orders: usize,
    pub pending_orders: usize,
    pub total_revenue: Decimal,
    pub total_bookings: usize,
    pub pending_bookings: usize,
    pub total_reviews: usize,
    /// Mean overall rating, one decimal place
    pub average_rating: f64,
    pub newsletter_subscribers: usize,
    pub today_orders: usize,
    pub today_revenue: Decimal,
}

#[derive(Clone)]
pub struct AdminService {
    store: Arc<dyn DocumentStore>,
    config: Arc<ServiceConfig>,
}

impl AdminService {
    pub fn new(store: Arc<dyn DocumentStore>, config: Arc<ServiceConfig>) -> Self {
        Self { store, config }
    }

    /// Totals over every order, booking, review and subscriber. "Today"
    /// starts at midnight on the restaurant's clock.
    #[instrument(skip(self))]
    pub async fn dashboard(&self, now: DateTime<Utc>) -> Result<DashboardStats> {
        let store = self.store.as_ref();
        let everything = Query::new();
        let (orders, bookings, reviews, subscribers) = tokio::try_join!(
            list::<Order>(store, collections::ORDERS, &everything),
            list::<Booking>(store, collections::BOOKINGS, &everything),
            list::<Review>(store, collections::REVIEWS, &everything),
            list::<NewsletterSubscriber>(store, collections::NEWSLETTER, &everything),
        )?;
        debug!(
            "Dashboard over {} orders, {} bookings, {} reviews",
            orders.len(),
            bookings.len(),
            reviews.len()
        );

        let offset = self.config.local_offset();
        let today = now.with_timezone(&offset).date_naive();
        let todays: Vec<&Order> = orders
            .iter()
            .filter(|o| o.created_at.with_timezone(&offset).date_naive() >= today)
            .collect();

        let average = summarize(&reviews).overall;

        Ok(DashboardStats {
            total_orders: orders.len(),
            pending_orders: orders.iter().filter(|o| o.status == OrderStatus::Pending).count(),
            total_revenue: orders.iter().map(|o| o.total).sum(),
            total_bookings: bookings.len(),
            pending_bookings: bookings
                .iter()
                .filter(|b| b.status == BookingStatus::Pending)
                .count(),
            total_reviews: reviews.len(),
            average_rating: (average * 10.0).round() / 10.0,
            newsletter_subscribers: subscribers.len(),
            today_orders: todays.len(),
            today_revenue: todays.iter().map(|o| o.total).sum(),
        })
    }
}
