//! Orders: checkout, lookups and the status lifecycle.
//!
//! Completing an order is the hook into the loyalty program. The loyalty
//! work runs after the status change is stored, and a loyalty failure is
//! logged without undoing the completion.

use super::{fetch, list, non_blank, remove, required, MenuService};
use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};
use crate::notify::EmailNotifier;
use crate::payment::PaymentGateway;
use chrono::{DateTime, Utc};
use domain::{Cart, MenuCatalog, Order, OrderStatus, OrderType, PaymentMethod, User};
use loyalty::LoyaltyEngine;
use rust_decimal::Decimal;
use std::sync::Arc;
use store::{collections, to_fields, Direction, DocumentStore, Query};
use tracing::{error, info, instrument, warn};

const PIZZA_CATEGORY: &str = "pizza";
const GRILLED_TAG: &str = "grilled";

/// What the diner fills in at checkout besides the cart
#[derive(Debug, Clone, Default)]
pub struct CheckoutDetails {
    pub phone_number: String,
    pub delivery_address: Option<String>,
    pub delivery_instructions: Option<String>,
    pub table_number: Option<String>,
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    pub order: Order,
    pub confirmation_sent: bool,
    pub admin_notified: bool,
}

/// Result of a status change, with any loyalty side effects
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub order: Order,
    pub points_awarded: u64,
    pub achievements_unlocked: Vec<&'static str>,
}

#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn DocumentStore>,
    menu: MenuService,
    loyalty: LoyaltyEngine,
    notifier: EmailNotifier,
    payments: Arc<dyn PaymentGateway>,
    config: Arc<ServiceConfig>,
}

impl OrderService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        menu: MenuService,
        loyalty: LoyaltyEngine,
        notifier: EmailNotifier,
        payments: Arc<dyn PaymentGateway>,
        config: Arc<ServiceConfig>,
    ) -> Self {
        Self {
            store,
            menu,
            loyalty,
            notifier,
            payments,
            config,
        }
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Validate the cart, take payment for card orders, store the order and
    /// send the confirmation and kitchen emails.
    #[instrument(skip(self, cart, details), fields(user = %user.id))]
    pub async fn checkout(
        &self,
        user: &User,
        cart: &Cart,
        details: CheckoutDetails,
        now: DateTime<Utc>,
    ) -> Result<CheckoutReceipt> {
        if cart.is_empty() {
            return Err(ServiceError::validation("Your cart is empty"));
        }
        let delivery_address = match cart.order_type {
            OrderType::Delivery => Some(required(
                details.delivery_address.as_deref().unwrap_or_default(),
                "Please enter a delivery address",
            )?),
            _ => None,
        };
        let phone_number = required(&details.phone_number, "Please enter your phone number")?;
        let delivery_instructions = match cart.order_type {
            OrderType::Delivery => non_blank(details.delivery_instructions),
            _ => None,
        };

        let catalog = self.menu.catalog().await?;
        check_cart_against_menu(cart, &catalog)?;

        let subtotal = cart.subtotal();
        let delivery_fee = cart.delivery_fee(self.config.delivery_fee);
        let total = subtotal + delivery_fee;

        let payment_intent_id = match details.payment_method {
            Some(PaymentMethod::Card) => {
                let description = format!("{} order for {}", self.config.restaurant.name, user.email);
                let receipt = self.payments.charge(total, &description).await?;
                Some(receipt.payment_intent_id)
            }
            _ => None,
        };

        let order = Order {
            id: String::new(),
            user_id: user.id.clone(),
            user_email: user.email.clone(),
            user_name: display_name_or_guest(user),
            items: cart.lines().to_vec(),
            order_type: cart.order_type,
            delivery_address,
            delivery_instructions,
            table_number: non_blank(details.table_number),
            phone_number: Some(phone_number),
            subtotal,
            delivery_fee,
            total,
            status: OrderStatus::Pending,
            payment_method: details.payment_method,
            payment_intent_id,
            created_at: now,
            updated_at: now,
        };
        let order = self.create_order(order).await?;

        let (confirmation_sent, admin_notified) = tokio::join!(
            self.notifier.order_confirmation(&order),
            self.notifier.admin_order_notification(&order),
        );
        if !confirmation_sent || !admin_notified {
            warn!("Order {} placed but not every email was sent", order.id);
        }

        Ok(CheckoutReceipt {
            order,
            confirmation_sent,
            admin_notified,
        })
    }

    // =========================================================================
    // CRUD
    // =========================================================================

    /// Store a new order and return it with its id
    #[instrument(skip(self, order), fields(user = %order.user_id))]
    pub async fn create_order(&self, mut order: Order) -> Result<Order> {
        if order.items.is_empty() {
            return Err(ServiceError::validation("An order needs at least one item"));
        }
        if order.user_id.trim().is_empty() {
            return Err(ServiceError::validation("An order needs a customer"));
        }
        order.id = self.store.insert(collections::ORDERS, to_fields(&order)?).await?;
        info!("Created order {} for R{:.2}", order.id, order.total);
        Ok(order)
    }

    pub async fn get_order(&self, order_id: &str) -> Result<Option<Order>> {
        fetch(self.store.as_ref(), collections::ORDERS, order_id).await
    }

    /// A user's orders, newest first
    pub async fn user_orders(&self, user_id: &str) -> Result<Vec<Order>> {
        let query = Query::new()
            .where_eq("user_id", user_id)
            .order_by("created_at", Direction::Descending);
        list(self.store.as_ref(), collections::ORDERS, &query).await
    }

    /// Every order, newest first
    pub async fn all_orders(&self) -> Result<Vec<Order>> {
        let query = Query::new().order_by("created_at", Direction::Descending);
        list(self.store.as_ref(), collections::ORDERS, &query).await
    }

    /// Move an order along its lifecycle.
    ///
    /// Completing an order credits loyalty points and checks the order,
    /// menu and visit achievements.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<StatusUpdate> {
        let document = self
            .store
            .get(collections::ORDERS, order_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order", order_id))?;
        let mut order: Order = document.decode()?;

        if !order.status.can_transition_to(status) {
            return Err(ServiceError::InvalidTransition {
                kind: "order",
                from: order.status.to_string(),
                to: status.to_string(),
            });
        }

        order.status = status;
        order.updated_at = now;

        // Written against the revision that passed the transition check, so
        // only one of two racing completions is stored and rewarded.
        self.store
            .replace_if_revision(collections::ORDERS, order_id, document.revision, to_fields(&order)?)
            .await
            .map_err(|e| {
                if e.is_conflict() {
                    warn!("Order {} changed while moving it to {}", order_id, status);
                }
                ServiceError::from(e)
            })?;
        info!("Order {} is now {}", order_id, status);

        let mut update = StatusUpdate {
            order,
            points_awarded: 0,
            achievements_unlocked: Vec::new(),
        };
        if status == OrderStatus::Completed {
            if let Err(e) = self.reward_completion(&mut update, now).await {
                error!("Loyalty update for order {} failed: {}", order_id, e);
            }
        }
        Ok(update)
    }

    #[instrument(skip(self))]
    pub async fn delete_order(&self, order_id: &str) -> Result<()> {
        remove(self.store.as_ref(), collections::ORDERS, "Order", order_id).await?;
        info!("Deleted order {}", order_id);
        Ok(())
    }

    async fn reward_completion(&self, update: &mut StatusUpdate, now: DateTime<Utc>) -> Result<()> {
        let order = &update.order;
        let user_id = order.user_id.as_str();

        update.points_awarded = self
            .loyalty
            .award_order_points(user_id, order.total, now)
            .await?;

        let completed: Vec<Order> = self
            .user_orders(user_id)
            .await?
            .into_iter()
            .filter(|o| o.status == OrderStatus::Completed)
            .collect();
        let total_spent: Decimal = completed.iter().map(|o| o.total).sum();

        let catalog = self.menu.catalog().await?;
        let (pizzas, grilled) = menu_counts(&completed, &catalog);

        let mut unlocked = self
            .loyalty
            .check_order_achievements(user_id, completed.len() as u64, total_spent, now)
            .await?;
        unlocked.extend(
            self.loyalty
                .check_menu_achievements(user_id, pizzas, grilled, now)
                .await?,
        );
        let placed_at = order.created_at.with_timezone(&self.config.local_offset());
        unlocked.extend(self.loyalty.check_visit_achievements(user_id, placed_at).await?);

        update.achievements_unlocked = unlocked;
        Ok(())
    }
}

/// Units of pizza, and of items tagged grilled, across the orders
fn menu_counts(orders: &[Order], catalog: &MenuCatalog) -> (u64, u64) {
    let mut pizzas = 0u64;
    let mut grilled = 0u64;
    for order in orders {
        pizzas += order.quantity_in_category(PIZZA_CATEGORY) as u64;
        for line in &order.items {
            if catalog.get(&line.name).is_some_and(|item| item.has_tag(GRILLED_TAG)) {
                grilled += line.quantity as u64;
            }
        }
    }
    (pizzas, grilled)
}

/// Every line must still be on the menu, available and at the menu price
fn check_cart_against_menu(cart: &Cart, catalog: &MenuCatalog) -> Result<()> {
    for line in cart.lines() {
        let item = catalog.require(&line.name)?;
        if !item.available {
            return Err(ServiceError::validation(format!(
                "{} is currently unavailable",
                item.name
            )));
        }
        if item.price != line.price {
            return Err(ServiceError::validation(format!(
                "The price of {} has changed to R{:.2}",
                item.name, item.price
            )));
        }
    }
    Ok(())
}

fn display_name_or_guest(user: &User) -> String {
    if user.display_name.trim().is_empty() {
        "Guest".to_string()
    } else {
        user.display_name.clone()
    }
}
