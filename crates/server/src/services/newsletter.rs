//! Newsletter sign-ups.

use super::{is_valid_email, list};
use crate::error::{Result, ServiceError};
use chrono::{DateTime, Utc};
use domain::{NewsletterPreferences, NewsletterSubscriber};
use std::sync::Arc;
use store::{collections, to_fields, Direction, DocumentStore, Query};
use tracing::{info, instrument};

#[derive(Clone)]
pub struct NewsletterService {
    store: Arc<dyn DocumentStore>,
}

impl NewsletterService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Add an active subscriber with every preference switched on.
    /// Emails are compared after trimming and lowercasing.
    #[instrument(skip(self))]
    pub async fn subscribe(
        &self,
        email: &str,
        name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<NewsletterSubscriber> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(ServiceError::validation("Please enter your email address"));
        }
        if !is_valid_email(&email) {
            return Err(ServiceError::validation("Please enter a valid email address"));
        }

        let existing = Query::new().where_eq("email", email.clone());
        if !self.store.query(collections::NEWSLETTER, &existing).await?.is_empty() {
            return Err(ServiceError::DuplicateSubscription(email));
        }

        let mut subscriber = NewsletterSubscriber {
            id: String::new(),
            email,
            name: name.map(str::trim).unwrap_or_default().to_string(),
            subscribed_at: now,
            is_active: true,
            preferences: NewsletterPreferences::default(),
        };
        subscriber.id = self
            .store
            .insert(collections::NEWSLETTER, to_fields(&subscriber)?)
            .await?;
        info!("New newsletter subscriber {}", subscriber.id);
        Ok(subscriber)
    }

    /// Every subscriber, most recent first
    pub async fn all_subscribers(&self) -> Result<Vec<NewsletterSubscriber>> {
        let query = Query::new().order_by("subscribed_at", Direction::Descending);
        list(self.store.as_ref(), collections::NEWSLETTER, &query).await
    }
}
