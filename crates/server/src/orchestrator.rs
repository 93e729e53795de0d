//! # Recommendation Orchestrator
//!
//! This module coordinates every recommendation mode:
//! 1. Resolve the menu in effect (stored items or the house catalog)
//! 2. Load what the mode needs from the store (user, order history, recent orders)
//! 3. Build the diner's preference summary
//! 4. Run the CPU-bound filtering and scoring on the blocking pool
//! 5. Return the ranked recommendations
//!
//! Nothing is cached: every call reads the store and recomputes.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use tracing::{info, instrument, warn};

use domain::{Order, User};
use pipeline::PersonalizedScorer;
use sources::{
    build_user_context, Candidate, ComplementarySource, Recommendation, SimilarSource,
    TimeBasedSource, TrendingSource, UserContext,
};
use store::{collections, decode_all, Direction, DocumentStore, Query};

use crate::config::ServiceConfig;
use crate::services::MenuService;

/// Which list the caller wants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationMode {
    /// Scored against the diner's history and saved preferences
    Personalized,
    /// Most ordered across all diners recently
    Trending,
    /// Goes well with the named item
    Complementary(String),
    /// Shares a category or tag with the named item
    Similar(String),
    /// Specials for the current local day and hour
    TimeBased,
}

/// Main orchestrator that wires the candidate sources and the personalized
/// scorer to the document store
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    store: Arc<dyn DocumentStore>,
    menu: MenuService,
    scorer: Arc<PersonalizedScorer>,
    history_window: usize,
    trending_window: usize,
    count: usize,
    offset: FixedOffset,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator using the house scoring weights
    pub fn new(store: Arc<dyn DocumentStore>, menu: MenuService, config: &ServiceConfig) -> Self {
        Self {
            store,
            menu,
            scorer: Arc::new(PersonalizedScorer::house()),
            history_window: config.history_window,
            trending_window: config.trending_window,
            count: config.recommendation_count,
            offset: config.local_offset(),
        }
    }

    /// Replace the scorer (builder pattern)
    pub fn with_scorer(mut self, scorer: PersonalizedScorer) -> Self {
        self.scorer = Arc::new(scorer);
        self
    }

    /// Default number of recommendations per list
    pub fn count(&self) -> usize {
        self.count
    }

    /// Main entry point: one list for one mode, `count` items at most.
    /// Time-based specials are judged at `now` on the restaurant's clock.
    #[instrument(skip(self))]
    pub async fn get_recommendations(
        &self,
        user_id: Option<&str>,
        mode: &RecommendationMode,
        count: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<Recommendation>> {
        let start_time = Instant::now();

        let recommendations = match mode {
            RecommendationMode::Personalized => self.personalized(user_id, count).await?,
            RecommendationMode::Trending => self.trending(count).await?,
            RecommendationMode::Complementary(item) => self.complementary(item, count).await?,
            RecommendationMode::Similar(item) => self.similar(item, count).await?,
            RecommendationMode::TimeBased => self.time_based(now).await?,
        };

        info!(
            "Produced {} {:?} recommendations in {:.2?}",
            recommendations.len(),
            mode,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Score the whole menu for a diner. Without a user id the diner is
    /// anonymous and only the item attributes count.
    pub async fn personalized(&self, user_id: Option<&str>, count: usize) -> Result<Vec<Recommendation>> {
        let catalog = self.menu.catalog().await.context("Failed to load the menu")?;
        let context = self.build_user_context(user_id).await?;
        info!(
            "Built context from {} orders, top categories {:?}",
            context.orders_considered, context.top_categories
        );

        let candidates = Candidate::all(&catalog);
        let scorer = self.scorer.clone();
        tokio::task::spawn_blocking(move || scorer.recommend(candidates, &context, count))
            .await
            .context("Scoring task panicked")?
            .context("Failed to score the menu")
    }

    /// What everyone has been ordering, or popular items when the order
    /// history is empty or cannot be read
    pub async fn trending(&self, count: usize) -> Result<Vec<Recommendation>> {
        let catalog = self.menu.catalog().await.context("Failed to load the menu")?;

        let query = Query::new()
            .order_by("created_at", Direction::Descending)
            .limit(self.trending_window);
        let orders: Vec<Order> = match self.load::<Order>(collections::ORDERS, &query).await {
            Ok(orders) => orders,
            Err(e) => {
                warn!("Could not read recent orders, falling back to popular items: {:#}", e);
                Vec::new()
            }
        };

        let source = TrendingSource::new(catalog).with_window(self.trending_window);
        tokio::task::spawn_blocking(move || source.get_candidates(&orders, count))
            .await
            .context("Trending task panicked")
    }

    pub async fn complementary(&self, item_name: &str, count: usize) -> Result<Vec<Recommendation>> {
        let catalog = self.menu.catalog().await.context("Failed to load the menu")?;
        Ok(ComplementarySource::new(catalog).get_candidates(item_name, count))
    }

    pub async fn similar(&self, item_name: &str, count: usize) -> Result<Vec<Recommendation>> {
        let catalog = self.menu.catalog().await.context("Failed to load the menu")?;
        Ok(SimilarSource::new(catalog).get_candidates(item_name, count))
    }

    pub async fn time_based(&self, now: DateTime<Utc>) -> Result<Vec<Recommendation>> {
        let catalog = self.menu.catalog().await.context("Failed to load the menu")?;
        let local = now.with_timezone(&self.offset);
        Ok(TimeBasedSource::new(catalog).get_candidates(&local))
    }

    /// Load the diner's saved preferences and recent orders in parallel
    async fn build_user_context(&self, user_id: Option<&str>) -> Result<UserContext> {
        let Some(user_id) = user_id else {
            return Ok(UserContext::anonymous());
        };

        let history = Query::new()
            .where_eq("user_id", user_id)
            .order_by("created_at", Direction::Descending)
            .limit(self.history_window);
        let (user, orders) = tokio::join!(
            self.store.get(collections::USERS, user_id),
            self.load::<Order>(collections::ORDERS, &history),
        );

        let preferences = match user.context("Failed to load user")? {
            Some(document) => document
                .decode::<User>()
                .context("Stored user is malformed")?
                .preferences,
            None => Default::default(),
        };
        let orders = orders.context("Failed to load order history")?;

        Ok(build_user_context(
            Some(user_id.to_string()),
            &orders,
            &preferences,
            self.history_window,
        ))
    }

    async fn load<T: serde::de::DeserializeOwned>(
        &self,
        collection: &str,
        query: &Query,
    ) -> Result<Vec<T>> {
        let documents = self.store.query(collection, query).await?;
        Ok(decode_all(&documents)?)
    }
}
