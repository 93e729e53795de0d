//! Simulated transactional email.
//!
//! Emails are rendered in full and written to the log instead of being
//! delivered. A send reports `false` rather than failing, so a broken email
//! never takes an order or booking down with it.

use crate::config::RestaurantInfo;
use domain::{Booking, Order, OrderItem, User};
use std::time::Duration;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub to: String,
    pub to_name: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct EmailNotifier {
    restaurant: RestaurantInfo,
    delay: Duration,
}

impl EmailNotifier {
    pub fn new(restaurant: RestaurantInfo) -> Self {
        Self {
            restaurant,
            delay: Duration::from_millis(500),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub async fn order_confirmation(&self, order: &Order) -> bool {
        self.send(self.render_order_confirmation(order)).await
    }

    pub async fn admin_order_notification(&self, order: &Order) -> bool {
        self.send(self.render_admin_order(order)).await
    }

    pub async fn booking_confirmation(&self, booking: &Booking) -> bool {
        self.send(self.render_booking_confirmation(booking)).await
    }

    pub async fn admin_booking_notification(&self, booking: &Booking) -> bool {
        self.send(self.render_admin_booking(booking)).await
    }

    pub async fn welcome(&self, user: &User) -> bool {
        self.send(self.render_welcome(user)).await
    }

    #[instrument(skip(self, email), fields(to = %email.to, subject = %email.subject))]
    async fn send(&self, email: Email) -> bool {
        if email.to.trim().is_empty() || !email.to.contains('@') {
            warn!("Not sending email with invalid recipient {:?}", email.to);
            return false;
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        info!("Email to {} <{}>: {}\n{}", email.to_name, email.to, email.subject, email.body);
        true
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    pub fn render_order_confirmation(&self, order: &Order) -> Email {
        let r = &self.restaurant;
        let body = format!(
            "Hi {name},\n\n\
             Thanks for your order!\n\n\
             Order: {id}\n\
             Type: {kind}\n\
             {items}\n\n\
             Total: R{total:.2}\n\
             Delivery address: {address}\n\
             Phone: {phone}\n\n\
             {restaurant}\n{street}\n{tel}",
            name = order.user_name,
            id = order.id,
            kind = order.order_type,
            items = items_list(&order.items),
            total = order.total,
            address = or_na(order.delivery_address.as_deref()),
            phone = or_na(order.phone_number.as_deref()),
            restaurant = r.name,
            street = r.address,
            tel = r.phone,
        );
        Email {
            to: order.user_email.clone(),
            to_name: order.user_name.clone(),
            subject: format!("{} order confirmation #{}", r.name, order.id),
            body,
        }
    }

    pub fn render_admin_order(&self, order: &Order) -> Email {
        let body = format!(
            "New {kind} order {id}\n\n\
             Customer: {name} <{email}>\n\
             Phone: {phone}\n\
             {items}\n\n\
             Total: R{total:.2}\n\
             Delivery address: {address}",
            kind = order.order_type,
            id = order.id,
            name = order.user_name,
            email = order.user_email,
            phone = or_na(order.phone_number.as_deref()),
            items = items_list(&order.items),
            total = order.total,
            address = or_na(order.delivery_address.as_deref()),
        );
        self.to_admin(format!("New order #{}", order.id), body)
    }

    pub fn render_booking_confirmation(&self, booking: &Booking) -> Email {
        let r = &self.restaurant;
        let body = format!(
            "Hi {name},\n\n\
             Your table is booked.\n\n\
             Booking: {id}\n\
             Date: {date}\n\
             Time: {time}\n\
             Guests: {guests}\n\
             Occasion: {occasion}\n\
             Special requests: {requests}\n\
             Phone: {phone}\n\n\
             {restaurant}\n{street}\n{tel}",
            name = booking.user_name,
            id = booking.id,
            date = booking.date.format("%Y-%m-%d"),
            time = booking.time.format("%H:%M"),
            guests = booking.guests,
            occasion = occasion(booking),
            requests = special_requests(booking),
            phone = or_na(Some(booking.phone_number.as_str())),
            restaurant = r.name,
            street = r.address,
            tel = r.phone,
        );
        Email {
            to: booking.user_email.clone(),
            to_name: booking.user_name.clone(),
            subject: format!("{} booking confirmation #{}", r.name, booking.id),
            body,
        }
    }

    pub fn render_admin_booking(&self, booking: &Booking) -> Email {
        let body = format!(
            "New booking {id}\n\n\
             Customer: {name} <{email}>\n\
             Phone: {phone}\n\
             Date: {date}\n\
             Time: {time}\n\
             Guests: {guests}\n\
             Occasion: {occasion}\n\
             Special requests: {requests}",
            id = booking.id,
            name = booking.user_name,
            email = booking.user_email,
            phone = or_na(Some(booking.phone_number.as_str())),
            date = booking.date.format("%Y-%m-%d"),
            time = booking.time.format("%H:%M"),
            guests = booking.guests,
            occasion = occasion(booking),
            requests = special_requests(booking),
        );
        self.to_admin(format!("New booking #{}", booking.id), body)
    }

    pub fn render_welcome(&self, user: &User) -> Email {
        let r = &self.restaurant;
        Email {
            to: user.email.clone(),
            to_name: user.display_name.clone(),
            subject: format!("Welcome to {}", r.name),
            body: format!(
                "Hi {},\n\nWelcome to {} - {}.\nYour loyalty account is ready.",
                user.display_name, r.name, r.tagline
            ),
        }
    }

    fn to_admin(&self, subject: String, body: String) -> Email {
        Email {
            to: self.restaurant.admin_email.clone(),
            to_name: format!("{} Admin", self.restaurant.name),
            subject,
            body,
        }
    }
}

/// One line per item: `2x Margherita Pizza - R240.00`
pub fn items_list(items: &[OrderItem]) -> String {
    items
        .iter()
        .map(|item| format!("{}x {} - R{:.2}", item.quantity, item.name, item.line_total()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "N/A",
    }
}

fn occasion(booking: &Booking) -> &str {
    booking
        .occasion
        .as_deref()
        .filter(|o| !o.trim().is_empty())
        .unwrap_or("Regular dining")
}

fn special_requests(booking: &Booking) -> &str {
    booking
        .special_requests
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .unwrap_or("None")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use domain::{BookingStatus, FoodPreferences, OrderStatus, OrderType};
    use rust_decimal::Decimal;

    fn notifier() -> EmailNotifier {
        EmailNotifier::new(RestaurantInfo::default()).with_delay(Duration::ZERO)
    }

    fn booking() -> Booking {
        let now = Utc::now();
        Booking {
            id: "b1".to_string(),
            user_id: "u1".to_string(),
            user_email: "sipho@example.com".to_string(),
            user_name: "Sipho".to_string(),
            phone_number: "0821234567".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            guests: 4,
            occasion: None,
            special_requests: Some("  ".to_string()),
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_items_list() {
        let items = vec![
            OrderItem {
                name: "Margherita Pizza".to_string(),
                price: Decimal::from(120),
                quantity: 2,
                category: "pizza".to_string(),
            },
            OrderItem {
                name: "8 Smoked Wings".to_string(),
                price: Decimal::new(9550, 2),
                quantity: 1,
                category: "poultry".to_string(),
            },
        ];
        assert_eq!(
            items_list(&items),
            "2x Margherita Pizza - R240.00\n1x 8 Smoked Wings - R95.50"
        );
    }

    #[test]
    fn test_booking_defaults() {
        let email = notifier().render_booking_confirmation(&booking());
        assert_eq!(email.to, "sipho@example.com");
        assert!(email.body.contains("Occasion: Regular dining"));
        assert!(email.body.contains("Special requests: None"));
        assert!(email.body.contains("Time: 19:00"));
        assert!(email.body.contains("881 Motlana St, Orlando West, Soweto"));
    }

    #[test]
    fn test_admin_order_goes_to_admin() {
        let now = Utc::now();
        let order = Order {
            id: "o1".to_string(),
            user_id: "u1".to_string(),
            user_email: "sipho@example.com".to_string(),
            user_name: "Sipho".to_string(),
            items: Vec::new(),
            order_type: OrderType::Takeaway,
            delivery_address: None,
            delivery_instructions: None,
            table_number: None,
            phone_number: None,
            subtotal: Decimal::ZERO,
            delivery_fee: Decimal::ZERO,
            total: Decimal::from(85),
            status: OrderStatus::Pending,
            payment_method: None,
            payment_intent_id: None,
            created_at: now,
            updated_at: now,
        };
        let email = notifier().render_admin_order(&order);
        assert_eq!(email.to, "admin@smokeville.co.za");
        assert_eq!(email.to_name, "SMOKEVILLE Admin");
        assert!(email.body.contains("Phone: N/A"));
        assert!(email.body.contains("Total: R85.00"));
    }

    #[tokio::test]
    async fn test_send_rejects_bad_recipient() {
        let notifier = notifier();
        let user = User {
            id: "u1".to_string(),
            email: "not-an-email".to_string(),
            display_name: "Sipho".to_string(),
            phone: None,
            preferences: FoodPreferences::default(),
            created_at: Utc::now(),
        };
        assert!(!notifier.welcome(&user).await);

        let user = User {
            email: "sipho@example.com".to_string(),
            ..user
        };
        assert!(notifier.welcome(&user).await);
    }
}
