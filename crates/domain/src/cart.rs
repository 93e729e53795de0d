//! In-memory shopping cart.

use crate::catalog::MenuCatalog;
use crate::error::{DomainError, Result};
use crate::types::{MenuItem, OrderItem, OrderType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub order_type: OrderType,
    lines: Vec<OrderItem>,
}

impl Cart {
    pub fn new(order_type: OrderType) -> Self {
        Self {
            order_type,
            lines: Vec::new(),
        }
    }

    /// Build a cart from `(name, quantity)` pairs resolved against a catalog
    pub fn from_lines(
        order_type: OrderType,
        catalog: &MenuCatalog,
        lines: &[(String, u32)],
    ) -> Result<Self> {
        let mut cart = Cart::new(order_type);
        for (name, quantity) in lines {
            let item = catalog.require(name)?;
            if !item.available {
                return Err(DomainError::ValidationError(format!(
                    "{} is currently unavailable",
                    item.name
                )));
            }
            cart.add(item, *quantity);
        }
        Ok(cart)
    }

    /// Add units of an item, merging with an existing line of the same name
    pub fn add(&mut self, item: &MenuItem, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.lines.iter_mut().find(|line| line.name == item.name) {
            Some(line) => line.quantity += quantity,
            None => self.lines.push(OrderItem {
                name: item.name.clone(),
                price: item.price,
                quantity,
                category: item.category.clone(),
            }),
        }
    }

    /// Set a line's quantity; zero removes the line
    pub fn update_quantity(&mut self, name: &str, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return self.remove(name);
        }
        let line = self
            .lines
            .iter_mut()
            .find(|line| line.name == name)
            .ok_or_else(|| DomainError::UnknownItem(name.to_string()))?;
        line.quantity = quantity;
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<()> {
        let before = self.lines.len();
        self.lines.retain(|line| line.name != name);
        if self.lines.len() == before {
            return Err(DomainError::UnknownItem(name.to_string()));
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[OrderItem] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units in the cart
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(OrderItem::line_total).sum()
    }

    /// Delivery orders pay the flat fee, everything else is free
    pub fn delivery_fee(&self, flat_fee: Decimal) -> Decimal {
        if self.order_type == OrderType::Delivery {
            flat_fee
        } else {
            Decimal::ZERO
        }
    }

    pub fn total(&self, flat_fee: Decimal) -> Decimal {
        self.subtotal() + self.delivery_fee(flat_fee)
    }

    pub fn into_items(self) -> Vec<OrderItem> {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fee() -> Decimal {
        Decimal::from(30)
    }

    #[test]
    fn test_add_merges_lines() {
        let catalog = MenuCatalog::smokeville();
        let wings = catalog.get("8 Smoked Wings").unwrap();

        let mut cart = Cart::new(OrderType::Takeaway);
        cart.add(wings, 1);
        cart.add(wings, 2);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal(), Decimal::from(285));
        assert_eq!(cart.total(fee()), Decimal::from(285));
    }

    #[test]
    fn test_delivery_fee_only_for_delivery() {
        let catalog = MenuCatalog::smokeville();
        let lines = vec![("Margherita Pizza".to_string(), 2)];

        let delivery = Cart::from_lines(OrderType::Delivery, &catalog, &lines).unwrap();
        assert_eq!(delivery.delivery_fee(fee()), Decimal::from(30));
        assert_eq!(delivery.total(fee()), Decimal::from(270));

        let eat_in = Cart::from_lines(OrderType::EatIn, &catalog, &lines).unwrap();
        assert_eq!(eat_in.delivery_fee(fee()), Decimal::ZERO);
    }

    #[test]
    fn test_update_and_remove() {
        let catalog = MenuCatalog::smokeville();
        let mut cart = Cart::from_lines(
            OrderType::EatIn,
            &catalog,
            &[
                ("Beef Burger Deluxe".to_string(), 1),
                ("Mogodu Special".to_string(), 1),
            ],
        )
        .unwrap();

        cart.update_quantity("Beef Burger Deluxe", 4).unwrap();
        assert_eq!(cart.item_count(), 5);

        cart.update_quantity("Mogodu Special", 0).unwrap();
        assert_eq!(cart.lines().len(), 1);

        assert!(cart.remove("Mogodu Special").is_err());
        assert!(cart.update_quantity("Sushi", 1).is_err());
    }

    #[test]
    fn test_unknown_item_rejected() {
        let catalog = MenuCatalog::smokeville();
        let result = Cart::from_lines(OrderType::EatIn, &catalog, &[("Sushi".to_string(), 1)]);
        assert!(matches!(result, Err(DomainError::UnknownItem(_))));
    }
}
