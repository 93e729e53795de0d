//! # Server Crate
//!
//! The SMOKEVILLE service layer: recommendations, ordering, bookings,
//! reviews, gallery, newsletter, menu administration and the admin dashboard,
//! all over a shared `DocumentStore`.
//!
//! ## Main Components
//!
//! - **orchestrator**: `RecommendationOrchestrator`, one entry point for every recommendation mode
//! - **services**: CRUD and admin services, wired together by `Services`
//! - **notify**: Simulated transactional email
//! - **payment**: The card payment seam and its mock gateway
//! - **config**: `ServiceConfig`, loaded from JSON and the environment
//! - **error**: `ServiceError` for everything the services reject
//!
//! ## Example Usage
//!
//! ```ignore
//! use server::{RecommendationMode, ServiceConfig, Services};
//!
//! let services = Services::new(store, blobs, Arc::new(MenuCatalog::smokeville()), ServiceConfig::load(None)?);
//! let user = services.users.register("thandi@example.com", "Thandi", None, Utc::now()).await?;
//! let picks = services
//!     .recommendations
//!     .get_recommendations(Some(&user.id), &RecommendationMode::Personalized, 6, Utc::now())
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod notify;
pub mod orchestrator;
pub mod payment;
pub mod services;

pub use config::{RestaurantInfo, ServiceConfig, ADMIN_IDS_ENV};
pub use error::{Result, ServiceError};
pub use notify::{Email, EmailNotifier};
pub use orchestrator::{RecommendationMode, RecommendationOrchestrator};
pub use payment::{MockPaymentGateway, PaymentGateway, PaymentReceipt};
pub use services::{
    AdminService, BookingConfirmation, BookingService, CheckoutDetails, CheckoutReceipt,
    DashboardStats, GalleryService, MenuItemPatch, MenuService, NewBooking, NewsletterService,
    OrderService, RatingSummary, ReviewService, Services, StatusUpdate, Upload, UserService,
};
