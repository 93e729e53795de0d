//! Parsing of user-supplied values.
//!
//! Enum values travel as the same lowercase strings the documents store
//! (`extra-hot`, `eat-in`, `gluten-free`, ...). Anything else is rejected
//! with `DomainError::InvalidValue` naming the field.

use crate::error::{DomainError, Result};
use crate::types::*;
use chrono::{NaiveDate, NaiveTime};
use std::fmt;
use std::str::FromStr;

impl SpiceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            SpiceLevel::Mild => "mild",
            SpiceLevel::Medium => "medium",
            SpiceLevel::Hot => "hot",
            SpiceLevel::ExtraHot => "extra-hot",
        }
    }
}

impl FromStr for SpiceLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mild" => Ok(SpiceLevel::Mild),
            "medium" => Ok(SpiceLevel::Medium),
            "hot" => Ok(SpiceLevel::Hot),
            "extra-hot" | "extra_hot" => Ok(SpiceLevel::ExtraHot),
            _ => Err(DomainError::invalid("spice_level", s)),
        }
    }
}

impl FromStr for DietaryRestriction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vegetarian" => Ok(DietaryRestriction::Vegetarian),
            "vegan" => Ok(DietaryRestriction::Vegan),
            "gluten-free" | "gluten_free" => Ok(DietaryRestriction::GlutenFree),
            "halal" => Ok(DietaryRestriction::Halal),
            _ => Err(DomainError::invalid("dietary_restriction", s)),
        }
    }
}

impl OrderType {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderType::EatIn => "eat-in",
            OrderType::Takeaway => "takeaway",
            OrderType::Delivery => "delivery",
        }
    }
}

impl FromStr for OrderType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eat-in" | "eat_in" | "eatin" => Ok(OrderType::EatIn),
            "takeaway" => Ok(OrderType::Takeaway),
            "delivery" => Ok(OrderType::Delivery),
            _ => Err(DomainError::invalid("order_type", s)),
        }
    }
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            _ => Err(DomainError::invalid("order_status", s)),
        }
    }
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
            _ => Err(DomainError::invalid("booking_status", s)),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" => Ok(PaymentMethod::Card),
            "cash" => Ok(PaymentMethod::Cash),
            "eft" => Ok(PaymentMethod::Eft),
            _ => Err(DomainError::invalid("payment_method", s)),
        }
    }
}

impl MediaType {
    /// Classify an upload by its MIME type. Only `image/*` and `video/*`
    /// are accepted.
    pub fn from_mime(mime: &str) -> Result<Self> {
        let mime = mime.trim().to_ascii_lowercase();
        if mime.starts_with("image/") {
            Ok(MediaType::Image)
        } else if mime.starts_with("video/") {
            Ok(MediaType::Video)
        } else {
            Err(DomainError::invalid("content_type", mime))
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(SpiceLevel, OrderType, OrderStatus, BookingStatus);

/// Parse a booking date in `YYYY-MM-DD` form
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| DomainError::invalid("date", s))
}

/// Parse a booking time slot in `HH:MM` form
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|_| DomainError::invalid("time", s))
}

/// Parse a cart line of the form `name` or `name:quantity`.
///
/// Example: "8 Smoked Wings:2" -> ("8 Smoked Wings", 2)
///          "Margherita Pizza" -> ("Margherita Pizza", 1)
pub fn parse_cart_line(s: &str) -> Result<(String, u32)> {
    let (name, quantity) = match s.rsplit_once(':') {
        Some((name, qty)) => {
            let quantity: u32 = qty
                .trim()
                .parse()
                .map_err(|_| DomainError::invalid("quantity", qty))?;
            (name.trim(), quantity)
        }
        None => (s.trim(), 1),
    };

    if name.is_empty() {
        return Err(DomainError::missing("item name"));
    }
    if quantity == 0 {
        return Err(DomainError::invalid("quantity", 0));
    }
    Ok((name.to_string(), quantity))
}

/// Split a comma-separated list, dropping blanks.
pub fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
