//! # Loyalty Crate
//!
//! Points, levels, daily streaks, achievements and reward redemption for
//! registered diners.
//!
//! ## Main Components
//!
//! - **catalog**: Level thresholds, the achievement and reward tables, reward codes
//! - **profile**: `LoyaltyProfile` and its pure state transitions
//! - **engine**: `LoyaltyEngine`, which applies transitions against the document store
//! - **error**: Error types for loyalty operations
//!
//! ## Example Usage
//!
//! ```ignore
//! use loyalty::LoyaltyEngine;
//!
//! let engine = LoyaltyEngine::new(store.clone());
//! engine.award_order_points(&user_id, order.total, Utc::now()).await?;
//! let reward = engine.redeem_reward(&user_id, "discount_10", Utc::now()).await?;
//! println!("Your code: {}", reward.code);
//! ```

pub mod catalog;
pub mod engine;
pub mod error;
pub mod profile;

pub use catalog::{
    achievement_by_id, level_for, points_to_next_level, reward_by_id, AchievementDef, Perk, Rarity,
    RedeemedReward, RewardDef, UnlockedAchievement, ACHIEVEMENTS, LEVEL_THRESHOLDS, REWARDS,
};
pub use engine::{order_points, LoyaltyEngine, DEFAULT_REWARD_EXPIRY_DAYS};
pub use error::{LoyaltyError, Result};
pub use profile::{LoyaltyProfile, StreakChange};
