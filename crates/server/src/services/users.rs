//! Registration, profiles and admin checks.

use super::{fetch, is_valid_email, require, required};
use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};
use crate::notify::EmailNotifier;
use chrono::{DateTime, Utc};
use domain::{FoodPreferences, User};
use loyalty::LoyaltyEngine;
use std::sync::Arc;
use store::{collections, to_fields, DocumentStore, Query};
use tracing::{error, info, instrument};

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn DocumentStore>,
    loyalty: LoyaltyEngine,
    notifier: EmailNotifier,
    config: Arc<ServiceConfig>,
}

impl UserService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        loyalty: LoyaltyEngine,
        notifier: EmailNotifier,
        config: Arc<ServiceConfig>,
    ) -> Self {
        Self {
            store,
            loyalty,
            notifier,
            config,
        }
    }

    /// Create an account, open its loyalty profile and send the welcome email.
    #[instrument(skip(self))]
    pub async fn register(
        &self,
        email: &str,
        display_name: &str,
        phone: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<User> {
        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(ServiceError::validation("Please enter a valid email address"));
        }
        let display_name = required(display_name, "Display name is required")?;

        let taken = Query::new().where_eq("email", email.clone());
        if !self.store.query(collections::USERS, &taken).await?.is_empty() {
            return Err(ServiceError::validation(format!(
                "An account already exists for {}",
                email
            )));
        }

        let mut user = User {
            id: String::new(),
            email,
            display_name,
            phone: phone.map(str::trim).filter(|p| !p.is_empty()).map(str::to_string),
            preferences: FoodPreferences::default(),
            created_at: now,
        };
        user.id = self.store.insert(collections::USERS, to_fields(&user)?).await?;
        info!("Registered user {} ({})", user.id, user.email);

        if let Err(e) = self.loyalty.get_or_init(&user.id, now).await {
            error!("Failed to open loyalty profile for {}: {}", user.id, e);
        }
        self.notifier.welcome(&user).await;
        Ok(user)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        fetch(self.store.as_ref(), collections::USERS, user_id).await
    }

    pub async fn require_user(&self, user_id: &str) -> Result<User> {
        require(self.store.as_ref(), collections::USERS, "User", user_id).await
    }

    #[instrument(skip(self, preferences))]
    pub async fn update_preferences(
        &self,
        user_id: &str,
        preferences: FoodPreferences,
    ) -> Result<User> {
        let mut user = self.require_user(user_id).await?;
        user.preferences = preferences;
        let fields = serde_json::json!({ "preferences": user.preferences });
        self.store.update(collections::USERS, user_id, fields).await?;
        info!("Updated food preferences for {}", user_id);
        Ok(user)
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.config.is_admin(user_id)
    }

    /// Fail with `Forbidden` unless the user is a configured administrator
    pub fn require_admin(&self, user_id: &str) -> Result<()> {
        if self.is_admin(user_id) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(user_id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RestaurantInfo;
    use domain::{DietaryRestriction, SpiceLevel};
    use std::time::Duration;
    use store::MemoryStore;

    fn service(admins: &[&str]) -> UserService {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let mut config = ServiceConfig::default().without_delays();
        config.admin_ids = admins.iter().map(|a| a.to_string()).collect();
        UserService::new(
            store.clone(),
            LoyaltyEngine::new(store),
            EmailNotifier::new(RestaurantInfo::default()).with_delay(Duration::ZERO),
            Arc::new(config),
        )
    }

    #[tokio::test]
    async fn test_register_opens_loyalty() {
        let users = service(&[]);
        let user = users
            .register(" Naledi@Example.com ", "Naledi", Some(""), Utc::now())
            .await
            .unwrap();

        assert_eq!(user.email, "naledi@example.com");
        assert!(user.phone.is_none());
        assert!(users.loyalty.get(&user.id).await.unwrap().is_some());
        assert_eq!(users.require_user(&user.id).await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_register_validation() {
        let users = service(&[]);
        let now = Utc::now();
        assert!(users.register("nope", "Naledi", None, now).await.is_err());
        assert!(users.register("n@example.com", "  ", None, now).await.is_err());

        users.register("n@example.com", "Naledi", None, now).await.unwrap();
        assert!(matches!(
            users.register("N@example.com", "Naledi again", None, now).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_preferences() {
        let users = service(&[]);
        let user = users.register("n@example.com", "Naledi", None, Utc::now()).await.unwrap();

        let preferences = FoodPreferences {
            spice_level: SpiceLevel::Hot,
            dietary_restrictions: vec![DietaryRestriction::Halal],
            disliked_ingredients: vec!["olives".to_string()],
        };
        users.update_preferences(&user.id, preferences.clone()).await.unwrap();

        let stored = users.get_user(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.preferences, preferences);
        assert_eq!(stored.display_name, "Naledi");
    }

    #[tokio::test]
    async fn test_admin_checks() {
        let users = service(&["boss"]);
        assert!(users.is_admin("boss"));
        assert!(users.require_admin("boss").is_ok());
        assert!(matches!(users.require_admin("guest"), Err(ServiceError::Forbidden(_))));
    }
}
