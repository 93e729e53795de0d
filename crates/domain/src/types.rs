//! Core domain types for the restaurant.
//!
//! Every entity here is a plain record that the document store persists as
//! JSON. The `id` field is filled in from the document key when a record is
//! read back, so freshly built values carry an empty id until stored.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a registered user
pub type UserId = String;

/// Identifier of any stored document (orders, bookings, reviews, ...)
pub type DocumentId = String;

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Saved food preferences used by personalized recommendations
    #[serde(default)]
    pub preferences: FoodPreferences,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Menu
// =============================================================================

/// Four-step ordinal spice scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SpiceLevel {
    Mild,
    #[default]
    Medium,
    Hot,
    ExtraHot,
}

impl SpiceLevel {
    pub fn ordinal(self) -> u32 {
        match self {
            SpiceLevel::Mild => 0,
            SpiceLevel::Medium => 1,
            SpiceLevel::Hot => 2,
            SpiceLevel::ExtraHot => 3,
        }
    }

    /// Number of steps between two levels on the scale
    pub fn distance(self, other: SpiceLevel) -> u32 {
        self.ordinal().abs_diff(other.ordinal())
    }
}

/// Dietary restrictions a diner can declare.
///
/// An item satisfies a restriction only when it carries the matching tag.
/// Untagged items are treated as non-compliant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietaryRestriction {
    Vegetarian,
    Vegan,
    GlutenFree,
    Halal,
}

impl DietaryRestriction {
    pub fn required_tag(self) -> &'static str {
        match self {
            DietaryRestriction::Vegetarian => "vegetarian",
            DietaryRestriction::Vegan => "vegan",
            DietaryRestriction::GlutenFree => "gluten-free",
            DietaryRestriction::Halal => "halal",
        }
    }

    pub fn is_satisfied_by(self, item: &MenuItem) -> bool {
        item.has_tag(self.required_tag())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default)]
    pub id: DocumentId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub spice_level: SpiceLevel,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub featured: bool,
}

impl MenuItem {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn contains_ingredient(&self, ingredient: &str) -> bool {
        self.ingredients.iter().any(|i| i.eq_ignore_ascii_case(ingredient))
    }

    pub fn shares_tag_with(&self, other: &MenuItem) -> bool {
        self.tags.iter().any(|tag| other.has_tag(tag))
    }
}

/// Preferences a diner saved on their profile.
///
/// Category and item favourites are never stored; they are derived from
/// order history each time recommendations are computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodPreferences {
    #[serde(default)]
    pub spice_level: SpiceLevel,
    #[serde(default)]
    pub dietary_restrictions: Vec<DietaryRestriction>,
    #[serde(default)]
    pub disliked_ingredients: Vec<String>,
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    EatIn,
    Takeaway,
    Delivery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Cash,
    Eft,
}

/// Order lifecycle: pending → confirmed → preparing → ready → completed,
/// with cancellation possible from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Forward moves (skipping steps is allowed) and cancellation of open
    /// orders. Terminal orders never change.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            OrderStatus::Cancelled => true,
            _ => next > self,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub category: String,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub id: DocumentId,
    pub user_id: UserId,
    pub user_email: String,
    pub user_name: String,
    pub items: Vec<OrderItem>,
    pub order_type: OrderType,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub delivery_instructions: Option<String>,
    #[serde(default)]
    pub table_number: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub payment_intent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Total units across all lines in a category
    pub fn quantity_in_category(&self, category: &str) -> u32 {
        self.items
            .iter()
            .filter(|item| item.category == category)
            .map(|item| item.quantity)
            .sum()
    }
}

// =============================================================================
// Bookings
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            BookingStatus::Cancelled => true,
            _ => next > self,
        }
    }

    /// Bookings in these states hold seats
    pub fn holds_capacity(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default)]
    pub id: DocumentId,
    pub user_id: UserId,
    pub user_email: String,
    pub user_name: String,
    pub phone_number: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub guests: u32,
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default)]
    pub special_requests: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Reviews
// =============================================================================

/// The four 1-5 star ratings a review is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubRatings {
    pub service: u8,
    pub food: u8,
    pub ambience: u8,
    pub value: u8,
}

impl SubRatings {
    pub fn as_array(&self) -> [u8; 4] {
        [self.service, self.food, self.ambience, self.value]
    }

    /// Arithmetic mean of the four ratings
    pub fn overall(&self) -> f64 {
        let sum: u32 = self.as_array().iter().map(|&r| r as u32).sum();
        sum as f64 / 4.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub id: DocumentId,
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: String,
    pub ratings: SubRatings,
    pub overall_rating: f64,
    pub comment: String,
    #[serde(default)]
    pub helpful: u32,
    #[serde(default)]
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Gallery & Newsletter
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// Maximum upload size in bytes
    pub fn max_size(self) -> u64 {
        match self {
            MediaType::Image => 50 * 1024 * 1024,
            MediaType::Video => 100 * 1024 * 1024,
        }
    }

    pub fn folder(self) -> &'static str {
        match self {
            MediaType::Image => "images",
            MediaType::Video => "videos",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    #[serde(default)]
    pub id: DocumentId,
    pub url: String,
    pub title: String,
    pub category: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub uploaded_by: UserId,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub storage_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterPreferences {
    pub deals: bool,
    pub events: bool,
    pub news: bool,
}

impl Default for NewsletterPreferences {
    fn default() -> Self {
        Self {
            deals: true,
            events: true,
            news: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsletterSubscriber {
    #[serde(default)]
    pub id: DocumentId,
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub subscribed_at: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub preferences: NewsletterPreferences,
}

fn default_true() -> bool {
    true
}
