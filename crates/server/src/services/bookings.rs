//! Table bookings and slot capacity.
//!
//! A slot is one date and start time. Pending and confirmed bookings hold
//! their guests against the configured capacity; cancelled and completed
//! bookings release them.

use super::{fetch, list, non_blank, remove, required};
use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};
use crate::notify::EmailNotifier;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use domain::{Booking, BookingStatus, User};
use serde_json::json;
use std::sync::Arc;
use store::{collections, to_fields, DocumentStore, Query};
use tracing::{info, instrument, warn};

/// Booking form contents
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub name: String,
    pub phone_number: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub guests: u32,
    pub occasion: Option<String>,
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BookingConfirmation {
    pub booking: Booking,
    pub confirmation_sent: bool,
    pub admin_notified: bool,
}

#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn DocumentStore>,
    notifier: EmailNotifier,
    config: Arc<ServiceConfig>,
}

impl BookingService {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: EmailNotifier, config: Arc<ServiceConfig>) -> Self {
        Self {
            store,
            notifier,
            config,
        }
    }

    /// Validate the form, check the slot has room and store a pending booking.
    #[instrument(skip(self, user, request), fields(user = %user.id, date = %request.date, time = %request.time))]
    pub async fn create_booking(
        &self,
        user: &User,
        request: NewBooking,
        now: DateTime<Utc>,
    ) -> Result<BookingConfirmation> {
        let user_name = required(&request.name, "Please enter your name")?;
        let phone_number = required(&request.phone_number, "Please enter your phone number")?;
        if request.guests == 0 {
            return Err(ServiceError::validation("A booking needs at least one guest"));
        }
        let today = now.with_timezone(&self.config.local_offset()).date_naive();
        if request.date < today {
            return Err(ServiceError::validation("Please choose a date from today onwards"));
        }

        let available = self.check_availability(request.date, request.time).await?;
        if request.guests > available {
            return Err(ServiceError::CapacityExceeded {
                requested: request.guests,
                available,
            });
        }

        let mut booking = Booking {
            id: String::new(),
            user_id: user.id.clone(),
            user_email: user.email.clone(),
            user_name,
            phone_number,
            date: request.date,
            time: request.time,
            guests: request.guests,
            occasion: non_blank(request.occasion),
            special_requests: non_blank(request.special_requests),
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        booking.id = self
            .store
            .insert(collections::BOOKINGS, to_fields(&booking)?)
            .await?;
        info!(
            "Booked {} guests for {} {} ({})",
            booking.guests, booking.date, booking.time, booking.id
        );

        let (confirmation_sent, admin_notified) = tokio::join!(
            self.notifier.booking_confirmation(&booking),
            self.notifier.admin_booking_notification(&booking),
        );
        if !confirmation_sent || !admin_notified {
            warn!("Booking {} stored but not every email was sent", booking.id);
        }

        Ok(BookingConfirmation {
            booking,
            confirmation_sent,
            admin_notified,
        })
    }

    pub async fn get_booking(&self, booking_id: &str) -> Result<Option<Booking>> {
        fetch(self.store.as_ref(), collections::BOOKINGS, booking_id).await
    }

    /// A user's bookings, latest slot first
    pub async fn user_bookings(&self, user_id: &str) -> Result<Vec<Booking>> {
        let query = Query::new().where_eq("user_id", user_id);
        let mut bookings: Vec<Booking> = list(self.store.as_ref(), collections::BOOKINGS, &query).await?;
        sort_latest_slot_first(&mut bookings);
        Ok(bookings)
    }

    /// Every booking, latest slot first
    pub async fn all_bookings(&self) -> Result<Vec<Booking>> {
        let mut bookings: Vec<Booking> =
            list(self.store.as_ref(), collections::BOOKINGS, &Query::new()).await?;
        sort_latest_slot_first(&mut bookings);
        Ok(bookings)
    }

    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
        now: DateTime<Utc>,
    ) -> Result<Booking> {
        let booking = self
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Booking", booking_id))?;

        if !booking.status.can_transition_to(status) {
            return Err(ServiceError::InvalidTransition {
                kind: "booking",
                from: booking.status.to_string(),
                to: status.to_string(),
            });
        }

        let fields = json!({ "status": status, "updated_at": now });
        let document = self.store.update(collections::BOOKINGS, booking_id, fields).await?;
        info!("Booking {} is now {}", booking_id, status);
        Ok(document.decode()?)
    }

    pub async fn cancel_booking(&self, booking_id: &str, now: DateTime<Utc>) -> Result<Booking> {
        self.update_status(booking_id, BookingStatus::Cancelled, now).await
    }

    #[instrument(skip(self))]
    pub async fn delete_booking(&self, booking_id: &str) -> Result<()> {
        remove(self.store.as_ref(), collections::BOOKINGS, "Booking", booking_id).await?;
        info!("Deleted booking {}", booking_id);
        Ok(())
    }

    /// Seats left in a slot. Never negative, even if the slot is overbooked.
    #[instrument(skip(self))]
    pub async fn check_availability(&self, date: NaiveDate, time: NaiveTime) -> Result<u32> {
        let query = Query::new()
            .where_eq("date", json!(date))
            .where_eq("time", json!(time));
        let bookings: Vec<Booking> = list(self.store.as_ref(), collections::BOOKINGS, &query).await?;

        let booked: u32 = bookings
            .iter()
            .filter(|b| b.status.holds_capacity())
            .map(|b| b.guests)
            .sum();
        Ok(self.config.booking_capacity.saturating_sub(booked))
    }
}

fn sort_latest_slot_first(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| (b.date, b.time).cmp(&(a.date, a.time)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use store::MemoryStore;

    fn service(capacity: u32) -> BookingService {
        let config = ServiceConfig {
            booking_capacity: capacity,
            ..ServiceConfig::default()
        }
        .without_delays();
        let notifier = EmailNotifier::new(config.restaurant.clone()).with_delay(Duration::ZERO);
        BookingService::new(Arc::new(MemoryStore::new()), notifier, Arc::new(config))
    }

    fn user() -> User {
        User {
            id: "u1".to_string(),
            email: "lerato@example.com".to_string(),
            display_name: "Lerato".to_string(),
            phone: None,
            preferences: Default::default(),
            created_at: Utc::now(),
        }
    }

    fn request(guests: u32) -> NewBooking {
        NewBooking {
            name: "Lerato".to_string(),
            phone_number: "0821234567".to_string(),
            date: NaiveDate::from_ymd_opt(2031, 6, 20).unwrap(),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            guests,
            occasion: Some("Birthday".to_string()),
            special_requests: Some("  ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_booking_holds_seats() {
        let bookings = service(10);
        let slot = request(4);
        let confirmation = bookings.create_booking(&user(), slot.clone(), Utc::now()).await.unwrap();

        assert_eq!(confirmation.booking.status, BookingStatus::Pending);
        assert!(confirmation.confirmation_sent);
        assert_eq!(confirmation.booking.special_requests, None);
        assert_eq!(bookings.check_availability(slot.date, slot.time).await.unwrap(), 6);

        let other_time = NaiveTime::from_hms_opt(20, 0, 0).unwrap();
        assert_eq!(bookings.check_availability(slot.date, other_time).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_capacity_exceeded() {
        let bookings = service(6);
        bookings.create_booking(&user(), request(4), Utc::now()).await.unwrap();

        let err = bookings.create_booking(&user(), request(3), Utc::now()).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::CapacityExceeded {
                requested: 3,
                available: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_cancelling_releases_seats() {
        let bookings = service(6);
        let slot = request(6);
        let booking = bookings.create_booking(&user(), slot.clone(), Utc::now()).await.unwrap().booking;
        assert_eq!(bookings.check_availability(slot.date, slot.time).await.unwrap(), 0);

        let cancelled = bookings.cancel_booking(&booking.id, Utc::now()).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(bookings.check_availability(slot.date, slot.time).await.unwrap(), 6);

        let err = bookings
            .update_status(&booking.id, BookingStatus::Confirmed, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_validation() {
        let bookings = service(10);
        let mut missing_phone = request(2);
        missing_phone.phone_number = " ".to_string();
        assert!(matches!(
            bookings.create_booking(&user(), missing_phone, Utc::now()).await,
            Err(ServiceError::Validation(_))
        ));

        assert!(matches!(
            bookings.create_booking(&user(), request(0), Utc::now()).await,
            Err(ServiceError::Validation(_))
        ));

        let mut past = request(2);
        past.date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert!(matches!(
            bookings.create_booking(&user(), past, Utc::now()).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_bookings_sorted_latest_slot_first() {
        let bookings = service(50);
        let mut early = request(2);
        early.date = NaiveDate::from_ymd_opt(2031, 6, 1).unwrap();
        let late = request(2);
        bookings.create_booking(&user(), late, Utc::now()).await.unwrap();
        bookings.create_booking(&user(), early, Utc::now()).await.unwrap();

        let listed = bookings.user_bookings("u1").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].date > listed[1].date);
        assert!(bookings.user_bookings("someone-else").await.unwrap().is_empty());
    }
}
