//! Store-backed loyalty operations.
//!
//! Every operation reads the profile once, applies its transitions in memory
//! and writes back with `replace_if_revision`. If another writer got there
//! first the write fails with a conflict and nothing is changed; the caller
//! decides whether to resubmit.

use crate::catalog::{generate_reward_code, ids, reward_by_id, RedeemedReward};
use crate::error::{LoyaltyError, Result};
use crate::profile::{LoyaltyProfile, StreakChange};
use chrono::{DateTime, Datelike, Duration, FixedOffset, Timelike, Utc, Weekday};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;
use store::{collections, to_fields, Direction, DocumentStore, Query};
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_REWARD_EXPIRY_DAYS: i64 = 30;

/// Rand spent per loyalty point earned on an order
const RAND_PER_POINT: u64 = 10;

/// Order-count milestones, lowest first
const ORDER_MILESTONES: [(u64, &str); 4] = [
    (1, ids::FIRST_ORDER),
    (5, ids::FIVE_ORDERS),
    (10, ids::TEN_ORDERS),
    (50, ids::FIFTY_ORDERS),
];

const BIG_SPENDER_THRESHOLD: i64 = 1000;
const REVIEWER_THRESHOLD: u64 = 5;
const MENU_MILESTONE: u64 = 10;
const EARLY_BIRD_BEFORE_HOUR: u32 = 10;
const NIGHT_OWL_FROM_HOUR: u32 = 22;

#[derive(Clone)]
pub struct LoyaltyEngine {
    store: Arc<dyn DocumentStore>,
    reward_validity: Duration,
}

impl LoyaltyEngine {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            reward_validity: Duration::days(DEFAULT_REWARD_EXPIRY_DAYS),
        }
    }

    pub fn with_reward_expiry_days(mut self, days: i64) -> Self {
        self.reward_validity = Duration::days(days);
        self
    }

    /// Stored profile, or `None` if the user has never been initialised
    pub async fn get(&self, user_id: &str) -> Result<Option<LoyaltyProfile>> {
        match self.store.get(collections::LOYALTY, user_id).await? {
            Some(document) => Ok(Some(document.decode()?)),
            None => Ok(None),
        }
    }

    /// Return the profile, creating an empty one on first use.
    #[instrument(skip(self))]
    pub async fn get_or_init(&self, user_id: &str, now: DateTime<Utc>) -> Result<LoyaltyProfile> {
        let (profile, revision) = self.load(user_id, now).await?;
        if revision > 0 {
            return Ok(profile);
        }

        match self.commit(&profile, 0).await {
            Ok(()) => {
                info!("Initialised loyalty profile for {}", user_id);
                Ok(profile)
            }
            Err(e) if e.is_conflict() => {
                // created by a concurrent first visit
                debug!("Loyalty profile for {} created concurrently", user_id);
                self.load(user_id, now).await.map(|(profile, _)| profile)
            }
            Err(e) => Err(e),
        }
    }

    /// Credit points to the spendable and lifetime balances.
    #[instrument(skip(self))]
    pub async fn add_points(
        &self,
        user_id: &str,
        points: u64,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<LoyaltyProfile> {
        self.mutate(user_id, now, |profile| {
            if let Some(level) = profile.add_points(points) {
                info!("{} reached level {}", user_id, level);
            }
            profile.updated_at = now;
            Ok((profile.clone(), true))
        })
        .await
    }

    /// Update the daily streak for a visit at `now` and return it.
    #[instrument(skip(self))]
    pub async fn update_streak(&self, user_id: &str, now: DateTime<Utc>) -> Result<u32> {
        self.mutate(user_id, now, |profile| {
            let change = profile.record_visit(now);
            debug!("Streak for {}: {:?} -> {}", user_id, change, profile.streak);
            Ok((profile.streak, change != StreakChange::Unchanged))
        })
        .await
    }

    /// Unlock an achievement by id. Returns false if it was already held.
    #[instrument(skip(self))]
    pub async fn unlock_achievement(
        &self,
        user_id: &str,
        achievement_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        self.mutate(user_id, now, |profile| {
            let unlocked = profile.unlock_id(achievement_id, now)?;
            if unlocked {
                info!("{} unlocked {}", user_id, achievement_id);
            }
            Ok((unlocked, unlocked))
        })
        .await
    }

    /// Exchange points for a reward and return the issued copy.
    #[instrument(skip(self))]
    pub async fn redeem_reward(
        &self,
        user_id: &str,
        reward_id: &str,
        now: DateTime<Utc>,
    ) -> Result<RedeemedReward> {
        let reward =
            reward_by_id(reward_id).ok_or_else(|| LoyaltyError::UnknownReward(reward_id.to_string()))?;
        let validity = self.reward_validity;

        let issued = self
            .mutate(user_id, now, |profile| {
                let issued = profile.redeem(reward, generate_reward_code(), now, validity)?;
                Ok((issued, true))
            })
            .await;

        match &issued {
            Ok(redeemed) => info!("{} redeemed {} ({})", user_id, reward_id, redeemed.code),
            Err(e) => warn!("Redemption of {} by {} failed: {}", reward_id, user_id, e),
        }
        issued
    }

    /// One point per R10 of the order total, then a streak update.
    /// Returns the points credited.
    #[instrument(skip(self))]
    pub async fn award_order_points(
        &self,
        user_id: &str,
        order_total: Decimal,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        let points = order_points(order_total);
        self.mutate(user_id, now, |profile| {
            if let Some(level) = profile.add_points(points) {
                info!("{} reached level {}", user_id, level);
            }
            profile.record_visit(now);
            Ok((points, true))
        })
        .await
    }

    /// Unlock every order-count milestone reached, plus big spender once
    /// lifetime spend hits R1000. Returns the newly unlocked ids.
    #[instrument(skip(self))]
    pub async fn check_order_achievements(
        &self,
        user_id: &str,
        order_count: u64,
        total_spent: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Vec<&'static str>> {
        let mut due: Vec<&'static str> = ORDER_MILESTONES
            .iter()
            // at-or-past, so a milestone skipped by a missed check still unlocks
            .filter(|(threshold, _)| order_count >= *threshold)
            .map(|(_, id)| *id)
            .collect();
        if total_spent >= Decimal::from(BIG_SPENDER_THRESHOLD) {
            due.push(ids::BIG_SPENDER);
        }
        self.unlock_all(user_id, &due, now).await
    }

    /// Pizza and grill milestones from lifetime item counts.
    #[instrument(skip(self))]
    pub async fn check_menu_achievements(
        &self,
        user_id: &str,
        pizzas: u64,
        grilled: u64,
        now: DateTime<Utc>,
    ) -> Result<Vec<&'static str>> {
        let mut due = Vec::new();
        if pizzas >= MENU_MILESTONE {
            due.push(ids::PIZZA_LOVER);
        }
        if grilled >= MENU_MILESTONE {
            due.push(ids::GRILL_MASTER);
        }
        self.unlock_all(user_id, &due, now).await
    }

    /// Time-of-visit achievements, judged on the restaurant's local clock.
    #[instrument(skip(self))]
    pub async fn check_visit_achievements(
        &self,
        user_id: &str,
        at: DateTime<FixedOffset>,
    ) -> Result<Vec<&'static str>> {
        let mut due = Vec::new();
        if at.hour() < EARLY_BIRD_BEFORE_HOUR {
            due.push(ids::EARLY_BIRD);
        }
        if at.hour() >= NIGHT_OWL_FROM_HOUR {
            due.push(ids::NIGHT_OWL);
        }
        if at.weekday() == Weekday::Mon {
            due.push(ids::MOGODU_MONDAY);
        }
        self.unlock_all(user_id, &due, at.with_timezone(&Utc)).await
    }

    #[instrument(skip(self))]
    pub async fn check_review_achievements(
        &self,
        user_id: &str,
        review_count: u64,
        now: DateTime<Utc>,
    ) -> Result<Vec<&'static str>> {
        if review_count >= REVIEWER_THRESHOLD {
            self.unlock_all(user_id, &[ids::REVIEWER], now).await
        } else {
            Ok(Vec::new())
        }
    }

    /// Top profiles by lifetime points
    pub async fn leaderboard(&self, limit: usize) -> Result<Vec<LoyaltyProfile>> {
        let query = Query::new()
            .order_by("total_points", Direction::Descending)
            .limit(limit);
        let documents = self.store.query(collections::LOYALTY, &query).await?;
        Ok(store::decode_all(&documents)?)
    }

    // =========================================================================
    // Read / conditional write
    // =========================================================================

    async fn unlock_all(
        &self,
        user_id: &str,
        achievement_ids: &[&'static str],
        now: DateTime<Utc>,
    ) -> Result<Vec<&'static str>> {
        if achievement_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.mutate(user_id, now, |profile| {
            let mut unlocked = Vec::new();
            for &id in achievement_ids {
                if profile.unlock_id(id, now)? {
                    info!("{} unlocked {}", user_id, id);
                    unlocked.push(id);
                }
            }
            let changed = !unlocked.is_empty();
            Ok((unlocked, changed))
        })
        .await
    }

    /// Profile plus the revision it was read at; revision 0 means not stored
    async fn load(&self, user_id: &str, now: DateTime<Utc>) -> Result<(LoyaltyProfile, u64)> {
        match self.store.get(collections::LOYALTY, user_id).await? {
            Some(document) => Ok((document.decode()?, document.revision)),
            None => Ok((LoyaltyProfile::new(user_id, now), 0)),
        }
    }

    async fn commit(&self, profile: &LoyaltyProfile, revision: u64) -> Result<()> {
        let fields = to_fields(profile)?;
        self.store
            .replace_if_revision(collections::LOYALTY, &profile.user_id, revision, fields)
            .await?;
        Ok(())
    }

    /// Load, apply `change`, and write back if it reports a modification.
    ///
    /// `change` returns the operation's result and whether the profile was
    /// modified. A profile that does not exist yet is created by the write.
    async fn mutate<T, F>(&self, user_id: &str, now: DateTime<Utc>, change: F) -> Result<T>
    where
        F: FnOnce(&mut LoyaltyProfile) -> Result<(T, bool)>,
    {
        let (mut profile, revision) = self.load(user_id, now).await?;
        let (output, modified) = change(&mut profile)?;
        if modified {
            profile.updated_at = now;
            self.commit(&profile, revision).await?;
        }
        Ok(output)
    }
}

/// Points earned for an order total, one per full R10
pub fn order_points(order_total: Decimal) -> u64 {
    if order_total.is_sign_negative() {
        return 0;
    }
    (order_total / Decimal::from(RAND_PER_POINT))
        .floor()
        .to_u64()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStore;

    fn engine() -> LoyaltyEngine {
        LoyaltyEngine::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_order_points() {
        assert_eq!(order_points(Decimal::new(9999, 2)), 9);
        assert_eq!(order_points(Decimal::from(100)), 10);
        assert_eq!(order_points(Decimal::from(5)), 0);
        assert_eq!(order_points(Decimal::from(-20)), 0);
    }

    #[tokio::test]
    async fn test_get_or_init_creates_once() {
        let engine = engine();
        let now = Utc::now();

        assert!(engine.get("u1").await.unwrap().is_none());
        let first = engine.get_or_init("u1", now).await.unwrap();
        let second = engine.get_or_init("u1", now + Duration::hours(1)).await.unwrap();

        assert_eq!(first.level, 1);
        assert_eq!(second.created_at, first.created_at);
    }

    #[tokio::test]
    async fn test_add_points_persists_level() {
        let engine = engine();
        let now = Utc::now();

        engine.add_points("u1", 1000, "welcome bonus", now).await.unwrap();
        let profile = engine.get("u1").await.unwrap().unwrap();
        assert_eq!(profile.total_points, 1000);
        assert_eq!(profile.level, 5);
    }

    #[tokio::test]
    async fn test_streak_unchanged_skips_write() {
        let store = Arc::new(MemoryStore::new());
        let engine = LoyaltyEngine::new(store.clone());
        let now = Utc::now();
        engine.get_or_init("u1", now).await.unwrap();

        let before = store.get(collections::LOYALTY, "u1").await.unwrap().unwrap();
        let streak = engine.update_streak("u1", now + Duration::hours(2)).await.unwrap();
        let after = store.get(collections::LOYALTY, "u1").await.unwrap().unwrap();

        assert_eq!(streak, 0);
        assert_eq!(before.revision, after.revision);
    }

    #[tokio::test]
    async fn test_unknown_reward() {
        let engine = engine();
        let result = engine.redeem_reward("u1", "free_beer", Utc::now()).await;
        assert!(matches!(result, Err(LoyaltyError::UnknownReward(_))));
    }

    #[tokio::test]
    async fn test_visit_achievements_use_local_clock() {
        let engine = engine();
        let sast = FixedOffset::east_opt(2 * 3600).unwrap();
        // Monday 10 March 2025, 23:30 in Soweto, 21:30 UTC
        let at = chrono::NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap()
            .and_local_timezone(sast)
            .unwrap();

        let unlocked = engine.check_visit_achievements("u1", at).await.unwrap();
        assert_eq!(unlocked, vec![ids::NIGHT_OWL, ids::MOGODU_MONDAY]);
    }
}
