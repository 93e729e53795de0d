//! The menu catalog and its lookup indices.
//!
//! A catalog is an ordered list of menu items. Catalog order matters: the
//! similar and time-based recommendation modes walk it front to back, and the
//! personalized ranking falls back to it when scores tie.

use crate::error::{DomainError, Result};
use crate::types::{MenuItem, SpiceLevel};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct MenuCatalog {
    items: Vec<MenuItem>,
    /// name -> position in `items`
    name_index: HashMap<String, usize>,
    /// category -> positions, in catalog order
    category_index: HashMap<String, Vec<usize>>,
    /// tag -> positions, in catalog order
    tag_index: HashMap<String, Vec<usize>>,
}

impl MenuCatalog {
    /// Build a catalog from items, rejecting duplicates and invalid entries
    pub fn from_items(items: Vec<MenuItem>) -> Result<Self> {
        let mut catalog = MenuCatalog {
            items,
            ..Default::default()
        };
        catalog.validate()?;
        catalog.build_indices();
        Ok(catalog)
    }

    /// Load a catalog from a JSON array of menu items
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DomainError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let raw = fs::read_to_string(path)?;
        let items: Vec<MenuItem> = serde_json::from_str(&raw)?;
        let catalog = Self::from_items(items)?;

        info!("Loaded {} menu items from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    /// The house menu the recommendation engine ships with
    pub fn smokeville() -> Self {
        let items = vec![
            item(
                "Smoked Full Chicken",
                "poultry",
                190,
                &["smoked", "popular", "protein-rich", "family-sized"],
                SpiceLevel::Mild,
                &["chicken", "spices", "smoke"],
                "photo-1709392975965-00889c6aa545",
            ),
            item(
                "BBQ Ribs Platter",
                "beef",
                250,
                &["grilled", "premium", "protein-rich", "party-favorite"],
                SpiceLevel::Medium,
                &["beef", "ribs", "bbq-sauce", "smoke"],
                "photo-1544025162-d76694265947",
            ),
            item(
                "Margherita Pizza",
                "pizza",
                120,
                &["vegetarian", "classic", "italian"],
                SpiceLevel::Mild,
                &["cheese", "tomato", "basil", "dough"],
                "photo-1574071318508-1cdbab80d002",
            ),
            item(
                "Peri-Peri Chicken Pizza",
                "pizza",
                140,
                &["spicy", "popular", "chicken"],
                SpiceLevel::Hot,
                &["chicken", "cheese", "peri-peri", "dough"],
                "photo-1628840042765-356cda07504e",
            ),
            item(
                "Beef Burger Deluxe",
                "burgers",
                85,
                &["classic", "filling", "comfort-food"],
                SpiceLevel::Mild,
                &["beef", "cheese", "lettuce", "tomato", "bun"],
                "photo-1568901346375-23c9450c58cd",
            ),
            item(
                "8 Smoked Wings",
                "poultry",
                95,
                &["smoked", "popular", "shareable", "protein-rich"],
                SpiceLevel::Medium,
                &["chicken", "wings", "spices", "smoke"],
                "photo-1592011432621-f7f576f44484",
            ),
            item(
                "Mogodu Special",
                "traditional",
                60,
                &["traditional", "monday-special", "authentic"],
                SpiceLevel::Mild,
                &["tripe", "spices", "vegetables"],
                "photo-1546069901-ba9599a7e63c",
            ),
            item(
                "Mixed Grill Platter",
                "platters",
                350,
                &["premium", "variety", "family-sized", "grilled"],
                SpiceLevel::Medium,
                &["chicken", "beef", "sausage", "ribs", "smoke"],
                "photo-1555939594-58d7cb561ad1",
            ),
            item(
                "Veggie Supreme Pizza",
                "pizza",
                130,
                &["vegetarian", "healthy", "colorful"],
                SpiceLevel::Mild,
                &["cheese", "peppers", "mushrooms", "olives", "dough"],
                "photo-1571997478779-2adcbbe9ab2f",
            ),
            item(
                "Spicy Beef Pizza",
                "pizza",
                145,
                &["spicy", "beef", "hearty"],
                SpiceLevel::Hot,
                &["beef", "cheese", "jalapeños", "onions", "dough"],
                "photo-1565299624946-b28f40a0ae38",
            ),
        ];

        let mut catalog = MenuCatalog {
            items,
            ..Default::default()
        };
        catalog.build_indices();
        catalog
    }

    fn build_indices(&mut self) {
        self.name_index.clear();
        self.category_index.clear();
        self.tag_index.clear();

        for (pos, item) in self.items.iter().enumerate() {
            self.name_index.insert(item.name.clone(), pos);
            self.category_index
                .entry(item.category.clone())
                .or_default()
                .push(pos);
            for tag in &item.tags {
                self.tag_index.entry(tag.clone()).or_default().push(pos);
            }
        }
        debug!(
            "Indexed {} items, {} categories, {} tags",
            self.items.len(),
            self.category_index.len(),
            self.tag_index.len()
        );
    }

    /// Check names are present and unique, categories set and prices non-negative
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashMap::new();
        for item in &self.items {
            if item.name.trim().is_empty() {
                return Err(DomainError::missing("name"));
            }
            if item.category.trim().is_empty() {
                return Err(DomainError::missing("category"));
            }
            if item.price.is_sign_negative() {
                return Err(DomainError::invalid("price", item.price));
            }
            if seen.insert(item.name.as_str(), ()).is_some() {
                return Err(DomainError::DuplicateItem(item.name.clone()));
            }
        }
        Ok(())
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&MenuItem> {
        self.name_index.get(name).map(|&pos| &self.items[pos])
    }

    /// Look an item up, failing with `UnknownItem`
    pub fn require(&self, name: &str) -> Result<&MenuItem> {
        self.get(name)
            .ok_or_else(|| DomainError::UnknownItem(name.to_string()))
    }

    /// Position of an item in catalog order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    pub fn by_category(&self, category: &str) -> Vec<&MenuItem> {
        self.lookup(&self.category_index, category)
    }

    pub fn by_tag(&self, tag: &str) -> Vec<&MenuItem> {
        self.lookup(&self.tag_index, tag)
    }

    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.category_index.keys().map(String::as_str).collect();
        categories.sort_unstable();
        categories
    }

    fn lookup(&self, index: &HashMap<String, Vec<usize>>, key: &str) -> Vec<&MenuItem> {
        index
            .get(key)
            .map(|positions| positions.iter().map(|&pos| &self.items[pos]).collect())
            .unwrap_or_default()
    }
}

fn item(
    name: &str,
    category: &str,
    price: i64,
    tags: &[&str],
    spice_level: SpiceLevel,
    ingredients: &[&str],
    photo: &str,
) -> MenuItem {
    MenuItem {
        id: String::new(),
        name: name.to_string(),
        description: String::new(),
        price: Decimal::from(price),
        category: category.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        spice_level,
        ingredients: ingredients.iter().map(|i| i.to_string()).collect(),
        image: Some(format!("https://images.unsplash.com/{}?w=400", photo)),
        available: true,
        featured: false,
    }
}
