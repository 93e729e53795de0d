//! CRUD and admin services over the document store.
//!
//! Each service is a thin, cloneable handle around `Arc<dyn DocumentStore>`
//! plus whatever collaborators it needs. Business rules stop at validation,
//! status transitions and in-memory aggregates.

pub mod admin;
pub mod bookings;
pub mod gallery;
pub mod menu;
pub mod newsletter;
pub mod orders;
pub mod reviews;
pub mod users;

pub use admin::{AdminService, DashboardStats};
pub use bookings::{BookingConfirmation, BookingService, NewBooking};
pub use gallery::{GalleryService, Upload};
pub use menu::{MenuItemPatch, MenuService};
pub use newsletter::NewsletterService;
pub use orders::{CheckoutDetails, CheckoutReceipt, OrderService, StatusUpdate};
pub use reviews::{RatingSummary, ReviewService};
pub use users::UserService;

use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};
use crate::notify::EmailNotifier;
use crate::orchestrator::RecommendationOrchestrator;
use crate::payment::{MockPaymentGateway, PaymentGateway};
use domain::MenuCatalog;
use loyalty::LoyaltyEngine;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use store::{BlobStore, DocumentStore, Query};

/// Every service wired to one store.
#[derive(Clone)]
pub struct Services {
    pub config: Arc<ServiceConfig>,
    pub loyalty: LoyaltyEngine,
    pub menu: MenuService,
    pub users: UserService,
    pub orders: OrderService,
    pub bookings: BookingService,
    pub reviews: ReviewService,
    pub gallery: GalleryService,
    pub newsletter: NewsletterService,
    pub admin: AdminService,
    pub recommendations: RecommendationOrchestrator,
}

impl Services {
    /// Wire the services with the mock payment gateway
    pub fn new(
        store: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        catalog: Arc<MenuCatalog>,
        config: ServiceConfig,
    ) -> Self {
        let payments = Arc::new(MockPaymentGateway::new(Duration::from_millis(
            config.payment_delay_ms,
        )));
        Self::with_gateway(store, blobs, catalog, config, payments)
    }

    pub fn with_gateway(
        store: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        catalog: Arc<MenuCatalog>,
        config: ServiceConfig,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        let config = Arc::new(config);
        let notifier = EmailNotifier::new(config.restaurant.clone())
            .with_delay(Duration::from_millis(config.email_delay_ms));
        let loyalty =
            LoyaltyEngine::new(store.clone()).with_reward_expiry_days(config.reward_expiry_days);

        let menu = MenuService::new(store.clone(), catalog);
        let users = UserService::new(store.clone(), loyalty.clone(), notifier.clone(), config.clone());
        let orders = OrderService::new(
            store.clone(),
            menu.clone(),
            loyalty.clone(),
            notifier.clone(),
            payments,
            config.clone(),
        );
        let bookings = BookingService::new(store.clone(), notifier, config.clone());
        let reviews = ReviewService::new(store.clone(), loyalty.clone());
        let gallery = GalleryService::new(store.clone(), blobs);
        let newsletter = NewsletterService::new(store.clone());
        let admin = AdminService::new(store.clone(), config.clone());
        let recommendations = RecommendationOrchestrator::new(store, menu.clone(), &config);

        Self {
            config,
            loyalty,
            menu,
            users,
            orders,
            bookings,
            reviews,
            gallery,
            newsletter,
            admin,
            recommendations,
        }
    }
}

// =============================================================================
// Shared store helpers
// =============================================================================

async fn fetch<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<Option<T>> {
    match store.get(collection, id).await? {
        Some(document) => Ok(Some(document.decode()?)),
        None => Ok(None),
    }
}

async fn require<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    kind: &'static str,
    id: &str,
) -> Result<T> {
    fetch(store, collection, id)
        .await?
        .ok_or_else(|| ServiceError::not_found(kind, id))
}

async fn list<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    query: &Query,
) -> Result<Vec<T>> {
    let documents = store.query(collection, query).await?;
    Ok(store::decode_all(&documents)?)
}

/// Delete that reports a missing document as `NotFound` for `kind`
async fn remove(store: &dyn DocumentStore, collection: &str, kind: &'static str, id: &str) -> Result<()> {
    match store.delete(collection, id).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_not_found() => Err(ServiceError::not_found(kind, id)),
        Err(e) => Err(e.into()),
    }
}

/// Trimmed value, or a validation error naming the field
fn required(value: &str, message: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ServiceError::validation(message))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Trimmed optional field, `None` when blank
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Loose shape check: something@domain.tld
fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}
