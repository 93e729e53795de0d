//! # Domain Crate
//!
//! Entity types shared by every other crate in the workspace: users, the
//! menu, orders, bookings, reviews, gallery media and newsletter
//! subscribers.
//!
//! ## Main Components
//!
//! - **types**: Core domain records and their status enums
//! - **parser**: Parse user-supplied strings into domain values
//! - **catalog**: The menu catalog with name, category and tag indices
//! - **cart**: Cart lines and totals prior to checkout
//! - **error**: Error types for parsing and validation
//!
//! ## Example Usage
//!
//! ```ignore
//! use domain::{Cart, MenuCatalog, OrderType};
//!
//! let catalog = MenuCatalog::smokeville();
//! let wings = catalog.require("8 Smoked Wings")?;
//!
//! let mut cart = Cart::new(OrderType::Delivery);
//! cart.add(wings, 2);
//! println!("Total: R{}", cart.total(30.into()));
//! ```

pub mod cart;
pub mod catalog;
pub mod error;
pub mod parser;
pub mod types;

pub use cart::Cart;
pub use catalog::MenuCatalog;
pub use error::{DomainError, Result};
pub use parser::{parse_cart_line, parse_date, parse_list, parse_time};
pub use types::{
    // Type aliases
    DocumentId,
    UserId,
    // Core types
    Booking,
    FoodPreferences,
    GalleryItem,
    MenuItem,
    NewsletterPreferences,
    NewsletterSubscriber,
    Order,
    OrderItem,
    Review,
    SubRatings,
    User,
    // Enums
    BookingStatus,
    DietaryRestriction,
    MediaType,
    OrderStatus,
    OrderType,
    PaymentMethod,
    SpiceLevel,
};
