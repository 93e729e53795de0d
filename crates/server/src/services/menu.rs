//! Menu administration.
//!
//! The house catalog is the menu until an administrator stores items in the
//! `menu` collection; from then on the stored items are the menu.

use super::{list, remove, require, required};
use crate::error::{Result, ServiceError};
use domain::{MenuCatalog, MenuItem};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use store::{collections, to_fields, DocumentStore, Query};
use tracing::{info, instrument};

/// Fields an administrator can change on an existing item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl MenuItemPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.price.is_none()
            && self.available.is_none()
            && self.featured.is_none()
    }
}

#[derive(Clone)]
pub struct MenuService {
    store: Arc<dyn DocumentStore>,
    house: Arc<MenuCatalog>,
}

impl MenuService {
    pub fn new(store: Arc<dyn DocumentStore>, house: Arc<MenuCatalog>) -> Self {
        Self { store, house }
    }

    /// Items stored by administrators, in insertion order
    pub async fn all_items(&self) -> Result<Vec<MenuItem>> {
        list(self.store.as_ref(), collections::MENU, &Query::new()).await
    }

    /// The menu in effect: stored items if there are any, else the house catalog
    pub async fn catalog(&self) -> Result<Arc<MenuCatalog>> {
        let stored = self.all_items().await?;
        if stored.is_empty() {
            return Ok(self.house.clone());
        }
        Ok(Arc::new(MenuCatalog::from_items(stored)?))
    }

    #[instrument(skip(self, item), fields(name = %item.name))]
    pub async fn add_item(&self, mut item: MenuItem) -> Result<MenuItem> {
        item.name = required(&item.name, "Item name is required")?;
        item.category = required(&item.category, "Category is required")?;
        if item.price < Decimal::ZERO {
            return Err(ServiceError::validation("Price cannot be negative"));
        }

        let existing = Query::new().where_eq("name", item.name.clone());
        if !self.store.query(collections::MENU, &existing).await?.is_empty() {
            return Err(ServiceError::validation(format!(
                "A menu item named {} already exists",
                item.name
            )));
        }

        item.id = self.store.insert(collections::MENU, to_fields(&item)?).await?;
        info!("Added menu item {} ({})", item.name, item.id);
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn update_item(&self, id: &str, patch: &MenuItemPatch) -> Result<MenuItem> {
        if patch.is_empty() {
            return Err(ServiceError::validation("Nothing to update"));
        }
        if patch.price.is_some_and(|price| price < Decimal::ZERO) {
            return Err(ServiceError::validation("Price cannot be negative"));
        }
        require::<MenuItem>(self.store.as_ref(), collections::MENU, "Menu item", id).await?;

        let document = self
            .store
            .update(collections::MENU, id, serde_json::to_value(patch).map_err(store::StoreError::from)?)
            .await?;
        info!("Updated menu item {}", id);
        Ok(document.decode()?)
    }

    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: &str) -> Result<()> {
        remove(self.store.as_ref(), collections::MENU, "Menu item", id).await?;
        info!("Deleted menu item {}", id);
        Ok(())
    }

    /// Copy the house catalog into the store. Returns the number of items added.
    #[instrument(skip(self))]
    pub async fn seed(&self) -> Result<usize> {
        if !self.all_items().await?.is_empty() {
            return Err(ServiceError::validation("The menu has already been stored"));
        }
        for item in self.house.items() {
            self.store.insert(collections::MENU, to_fields(item)?).await?;
        }
        info!("Seeded menu with {} items", self.house.len());
        Ok(self.house.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStore;

    fn service() -> MenuService {
        MenuService::new(Arc::new(MemoryStore::new()), Arc::new(MenuCatalog::smokeville()))
    }

    fn braai_plate() -> MenuItem {
        let mut item = MenuCatalog::smokeville().items()[1].clone();
        item.name = "Braai Plate".to_string();
        item
    }

    #[tokio::test]
    async fn test_house_catalog_until_stored() {
        let menu = service();
        assert_eq!(menu.catalog().await.unwrap().len(), 10);

        menu.add_item(braai_plate()).await.unwrap();
        let catalog = menu.catalog().await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("Braai Plate").is_some());
    }

    #[tokio::test]
    async fn test_add_rejects_duplicates_and_bad_prices() {
        let menu = service();
        menu.add_item(braai_plate()).await.unwrap();
        assert!(matches!(menu.add_item(braai_plate()).await, Err(ServiceError::Validation(_))));

        let mut cheap = braai_plate();
        cheap.name = "Free Lunch".to_string();
        cheap.price = Decimal::from(-1);
        assert!(matches!(menu.add_item(cheap).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let menu = service();
        let item = menu.add_item(braai_plate()).await.unwrap();

        let patch = MenuItemPatch {
            price: Some(Decimal::from(199)),
            available: Some(false),
            ..Default::default()
        };
        let updated = menu.update_item(&item.id, &patch).await.unwrap();
        assert_eq!(updated.price, Decimal::from(199));
        assert!(!updated.available);
        assert_eq!(updated.name, "Braai Plate");

        menu.delete_item(&item.id).await.unwrap();
        assert!(matches!(
            menu.delete_item(&item.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_seed_once() {
        let menu = service();
        assert_eq!(menu.seed().await.unwrap(), 10);
        assert_eq!(menu.all_items().await.unwrap().len(), 10);
        assert!(menu.seed().await.is_err());
    }
}
