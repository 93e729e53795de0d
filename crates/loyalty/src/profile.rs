//! The loyalty profile and its pure state transitions.
//!
//! Nothing here touches the store. The engine loads a profile, applies one
//! or more of these transitions, and writes the result back in a single
//! conditional write.

use crate::catalog::{
    achievement_by_id, ids, level_for, AchievementDef, RedeemedReward, RewardDef,
    UnlockedAchievement,
};
use crate::error::{LoyaltyError, Result};
use chrono::{DateTime, Duration, Utc};
use domain::UserId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoyaltyProfile {
    #[serde(default)]
    pub user_id: UserId,

    /// Spendable balance
    pub points: u64,

    /// Lifetime points, never decreases
    pub total_points: u64,

    pub level: u32,
    pub streak: u32,
    pub last_visit: DateTime<Utc>,

    #[serde(default)]
    pub achievements: Vec<UnlockedAchievement>,

    #[serde(default)]
    pub rewards: Vec<RedeemedReward>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a visit did to the streak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// Less than a day since the last visit
    Unchanged,
    /// Next-day visit
    Extended,
    /// Two days or more since the last visit
    Reset,
}

impl LoyaltyProfile {
    pub fn new(user_id: impl Into<UserId>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            points: 0,
            total_points: 0,
            level: 1,
            streak: 0,
            last_visit: now,
            achievements: Vec::new(),
            rewards: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Credit points to both balances. Returns the new level if it changed.
    pub fn add_points(&mut self, points: u64) -> Option<u32> {
        self.points = self.points.saturating_add(points);
        self.total_points = self.total_points.saturating_add(points);

        let level = level_for(self.total_points);
        if level != self.level {
            self.level = level;
            Some(level)
        } else {
            None
        }
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == id)
    }

    /// Record an achievement and credit its points. False if already held.
    pub fn unlock(&mut self, achievement: &AchievementDef, at: DateTime<Utc>) -> bool {
        if self.has_achievement(achievement.id) {
            return false;
        }
        self.achievements.push(achievement.unlock(at));
        self.add_points(achievement.points);
        true
    }

    /// Unlock by id, reporting whether it was new
    pub fn unlock_id(&mut self, id: &str, at: DateTime<Utc>) -> Result<bool> {
        let achievement =
            achievement_by_id(id).ok_or_else(|| LoyaltyError::UnknownAchievement(id.to_string()))?;
        Ok(self.unlock(achievement, at))
    }

    /// Advance the daily streak for a visit at `now`.
    ///
    /// A next-day visit extends the streak and unlocks the week and month
    /// streak achievements when the streak reaches exactly 7 or 30.
    pub fn record_visit(&mut self, now: DateTime<Utc>) -> StreakChange {
        let hours = (now - self.last_visit).num_hours();

        if hours < 24 {
            return StreakChange::Unchanged;
        }

        let change = if hours < 48 {
            self.streak += 1;
            match self.streak {
                7 => {
                    self.unlock_known(ids::WEEK_STREAK, now);
                }
                30 => {
                    self.unlock_known(ids::MONTH_STREAK, now);
                }
                _ => {}
            }
            StreakChange::Extended
        } else {
            self.streak = 1;
            StreakChange::Reset
        };

        self.last_visit = now;
        change
    }

    /// Spend points on a reward and record the issued copy.
    pub fn redeem(
        &mut self,
        reward: &RewardDef,
        code: String,
        at: DateTime<Utc>,
        valid_for: Duration,
    ) -> Result<RedeemedReward> {
        if self.points < reward.points_cost {
            return Err(LoyaltyError::InsufficientPoints {
                required: reward.points_cost,
                available: self.points,
            });
        }
        self.points -= reward.points_cost;

        let issued = reward.issue(code, at, valid_for);
        self.rewards.push(issued.clone());
        Ok(issued)
    }

    /// Rewards that are neither used nor expired
    pub fn active_rewards(&self, now: DateTime<Utc>) -> Vec<&RedeemedReward> {
        self.rewards
            .iter()
            .filter(|r| r.used_at.is_none() && !r.is_expired(now))
            .collect()
    }

    fn unlock_known(&mut self, id: &str, at: DateTime<Utc>) -> bool {
        match achievement_by_id(id) {
            Some(achievement) => self.unlock(achievement, at),
            None => false,
        }
    }
}
