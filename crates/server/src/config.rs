//! Service configuration.
//!
//! Defaults match the restaurant's house rules. A JSON file can override any
//! field, and `SMOKEVILLE_ADMIN_IDS` (comma separated) adds admin user ids.

use crate::error::{Result, ServiceError};
use chrono::{FixedOffset, Offset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

pub const ADMIN_IDS_ENV: &str = "SMOKEVILLE_ADMIN_IDS";

/// Contact details printed on every email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestaurantInfo {
    pub name: String,
    pub tagline: String,
    pub address: String,
    pub phone: String,
    pub admin_email: String,
}

impl Default for RestaurantInfo {
    fn default() -> Self {
        Self {
            name: "SMOKEVILLE".to_string(),
            tagline: "GRILL-PIZZA-BEVES".to_string(),
            address: "881 Motlana St, Orlando West, Soweto".to_string(),
            phone: "011 982 1001".to_string(),
            admin_email: "admin@smokeville.co.za".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub restaurant: RestaurantInfo,

    /// Seats available per booking slot
    pub booking_capacity: u32,

    /// Flat fee added to delivery orders
    pub delivery_fee: Decimal,

    /// Recent orders considered when personalising
    pub history_window: usize,

    /// Recent orders considered when ranking trending items
    pub trending_window: usize,

    pub recommendation_count: usize,
    pub reward_expiry_days: i64,

    /// Simulated card processing time
    pub payment_delay_ms: u64,

    /// Simulated email send time
    pub email_delay_ms: u64,

    /// Restaurant local time offset from UTC, in minutes
    pub utc_offset_minutes: i32,

    pub admin_ids: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            restaurant: RestaurantInfo::default(),
            booking_capacity: 100,
            delivery_fee: Decimal::from(30),
            history_window: 20,
            trending_window: 50,
            recommendation_count: 6,
            reward_expiry_days: 30,
            payment_delay_ms: 2000,
            email_delay_ms: 500,
            utc_offset_minutes: 120,
            admin_ids: Vec::new(),
        }
    }
}

impl ServiceConfig {
    /// Load from an optional JSON file, then apply the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Ok(ids) = std::env::var(ADMIN_IDS_ENV) {
            config.add_admin_ids(&ids);
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ServiceError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: ServiceConfig = serde_json::from_str(&raw)
            .map_err(|e| ServiceError::Config(format!("invalid {}: {}", path.display(), e)))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Add comma-separated admin ids, skipping blanks and duplicates
    pub fn add_admin_ids(&mut self, ids: &str) {
        for id in ids.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            if !self.admin_ids.iter().any(|existing| existing == id) {
                debug!("Registered admin id {}", id);
                self.admin_ids.push(id.to_string());
            }
        }
    }

    /// Zero simulated delays, for tests and scripted runs
    pub fn without_delays(mut self) -> Self {
        self.payment_delay_ms = 0;
        self.email_delay_ms = 0;
        self
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admin_ids.iter().any(|id| id == user_id)
    }

    /// Restaurant local timezone; falls back to UTC if the offset is out of range
    pub fn local_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.booking_capacity, 100);
        assert_eq!(config.delivery_fee, Decimal::from(30));
        assert_eq!(config.recommendation_count, 6);
        assert_eq!(config.restaurant.name, "SMOKEVILLE");
        assert_eq!(config.local_offset().local_minus_utc(), 7200);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"booking_capacity": 40, "admin_ids": ["boss"]}}"#).unwrap();

        let config = ServiceConfig::from_file(file.path()).unwrap();
        assert_eq!(config.booking_capacity, 40);
        assert_eq!(config.trending_window, 50);
        assert!(config.is_admin("boss"));
    }

    #[test]
    fn test_bad_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            ServiceConfig::from_file(file.path()),
            Err(ServiceError::Config(_))
        ));
    }

    #[test]
    fn test_add_admin_ids() {
        let mut config = ServiceConfig::default();
        config.add_admin_ids(" a1, ,b2,a1 ");
        assert_eq!(config.admin_ids, vec!["a1", "b2"]);
        assert!(!config.is_admin("c3"));
    }

    #[test]
    fn test_out_of_range_offset_falls_back_to_utc() {
        let config = ServiceConfig {
            utc_offset_minutes: 100_000,
            ..Default::default()
        };
        assert_eq!(config.local_offset().local_minus_utc(), 0);
    }
}
