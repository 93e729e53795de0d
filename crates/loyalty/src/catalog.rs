//! Static loyalty tables: level thresholds, achievements and rewards.

use chrono::{DateTime, Duration, Utc};
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

// =============================================================================
// Levels
// =============================================================================

/// Lifetime points needed for levels 1 through 10
pub const LEVEL_THRESHOLDS: [u64; 10] = [0, 100, 250, 500, 1000, 2000, 3500, 5500, 8000, 12000];

pub const MAX_LEVEL: u32 = LEVEL_THRESHOLDS.len() as u32;

/// Highest level whose threshold is at or below `total_points`.
pub fn level_for(total_points: u64) -> u32 {
    LEVEL_THRESHOLDS
        .iter()
        .rposition(|&threshold| total_points >= threshold)
        .map(|index| index as u32 + 1)
        .unwrap_or(1)
}

/// Lifetime points still needed to reach the next level, `None` at the top
pub fn points_to_next_level(total_points: u64) -> Option<u64> {
    let level = level_for(total_points) as usize;
    LEVEL_THRESHOLDS
        .get(level)
        .map(|&next| next.saturating_sub(total_points))
}

// =============================================================================
// Achievements
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

pub mod ids {
    pub const FIRST_ORDER: &str = "first_order";
    pub const FIVE_ORDERS: &str = "five_orders";
    pub const TEN_ORDERS: &str = "ten_orders";
    pub const FIFTY_ORDERS: &str = "fifty_orders";
    pub const WEEK_STREAK: &str = "week_streak";
    pub const MONTH_STREAK: &str = "month_streak";
    pub const PIZZA_LOVER: &str = "pizza_lover";
    pub const GRILL_MASTER: &str = "grill_master";
    pub const BIG_SPENDER: &str = "big_spender";
    pub const REVIEWER: &str = "reviewer";
    pub const EARLY_BIRD: &str = "early_bird";
    pub const NIGHT_OWL: &str = "night_owl";
    pub const MOGODU_MONDAY: &str = "mogodu_monday";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub points: u64,
    pub rarity: Rarity,
}

impl AchievementDef {
    pub fn unlock(&self, at: DateTime<Utc>) -> UnlockedAchievement {
        UnlockedAchievement {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            points: self.points,
            rarity: self.rarity,
            unlocked_at: at,
        }
    }
}

/// An achievement as recorded on a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub points: u64,
    pub rarity: Rarity,
    pub unlocked_at: DateTime<Utc>,
}

const fn achievement(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    points: u64,
    rarity: Rarity,
) -> AchievementDef {
    AchievementDef {
        id,
        name,
        description,
        points,
        rarity,
    }
}

pub const ACHIEVEMENTS: [AchievementDef; 13] = [
    achievement(ids::FIRST_ORDER, "First Bite", "Placed your first order", 50, Rarity::Common),
    achievement(ids::FIVE_ORDERS, "Regular Customer", "Placed 5 orders", 100, Rarity::Common),
    achievement(ids::TEN_ORDERS, "Smokeville Fan", "Placed 10 orders", 250, Rarity::Rare),
    achievement(ids::FIFTY_ORDERS, "Smokehouse Legend", "Placed 50 orders", 1000, Rarity::Legendary),
    achievement(ids::WEEK_STREAK, "Weekly Warrior", "7-day ordering streak", 200, Rarity::Rare),
    achievement(ids::MONTH_STREAK, "Monthly Master", "30-day ordering streak", 750, Rarity::Epic),
    achievement(ids::PIZZA_LOVER, "Pizza Perfectionist", "Ordered 10 pizzas", 150, Rarity::Common),
    achievement(ids::GRILL_MASTER, "Grill Master", "Ordered 10 grilled items", 150, Rarity::Common),
    achievement(ids::BIG_SPENDER, "Big Spender", "Spent R1000 in total", 300, Rarity::Rare),
    achievement(ids::REVIEWER, "Food Critic", "Left 5 reviews", 100, Rarity::Common),
    achievement(ids::EARLY_BIRD, "Early Bird", "Ordered before 10 AM", 75, Rarity::Common),
    achievement(ids::NIGHT_OWL, "Night Owl", "Ordered after 10 PM", 75, Rarity::Common),
    achievement(ids::MOGODU_MONDAY, "Monday Special", "Ordered on Mogodu Monday", 100, Rarity::Rare),
];

pub fn achievement_by_id(id: &str) -> Option<&'static AchievementDef> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

// =============================================================================
// Rewards
// =============================================================================

/// What a reward gives the diner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perk {
    /// Percentage off the next order
    Discount(u8),
    FreeItem(&'static str),
    FreeDelivery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub points_cost: u64,
    pub perk: Perk,
}

impl RewardDef {
    /// Issue a redeemed copy of this reward with a fresh code
    pub fn issue(&self, code: String, at: DateTime<Utc>, valid_for: Duration) -> RedeemedReward {
        let (discount, free_item) = match self.perk {
            Perk::Discount(percent) => (Some(percent), None),
            Perk::FreeItem(item) => (None, Some(item.to_string())),
            Perk::FreeDelivery => (Some(0), None),
        };
        RedeemedReward {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            points_cost: self.points_cost,
            discount,
            free_item,
            code,
            redeemed_at: at,
            expires_at: at + valid_for,
            used_at: None,
        }
    }
}

/// A reward as recorded on a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedeemedReward {
    pub id: String,
    pub name: String,
    pub description: String,
    pub points_cost: u64,
    #[serde(default)]
    pub discount: Option<u8>,
    #[serde(default)]
    pub free_item: Option<String>,
    pub code: String,
    pub redeemed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub used_at: Option<DateTime<Utc>>,
}

impl RedeemedReward {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

pub const REWARDS: [RewardDef; 6] = [
    RewardDef {
        id: "discount_10",
        name: "10% Off Next Order",
        description: "Get 10% discount on your next order",
        points_cost: 200,
        perk: Perk::Discount(10),
    },
    RewardDef {
        id: "discount_15",
        name: "15% Off Next Order",
        description: "Get 15% discount on your next order",
        points_cost: 350,
        perk: Perk::Discount(15),
    },
    RewardDef {
        id: "discount_20",
        name: "20% Off Next Order",
        description: "Get 20% discount on your next order",
        points_cost: 500,
        perk: Perk::Discount(20),
    },
    RewardDef {
        id: "free_wings",
        name: "Free 8 Wings",
        description: "Get a free order of 8 smoked wings",
        points_cost: 400,
        perk: Perk::FreeItem("8 Smoked Wings"),
    },
    RewardDef {
        id: "free_pizza",
        name: "Free Medium Pizza",
        description: "Get a free medium pizza of your choice",
        points_cost: 600,
        perk: Perk::FreeItem("Medium Pizza"),
    },
    RewardDef {
        id: "free_delivery",
        name: "Free Delivery",
        description: "Free delivery on your next order",
        points_cost: 150,
        perk: Perk::FreeDelivery,
    },
];

pub fn reward_by_id(id: &str) -> Option<&'static RewardDef> {
    REWARDS.iter().find(|r| r.id == id)
}

pub const REWARD_CODE_PREFIX: &str = "SMK-";
const REWARD_CODE_LEN: usize = 6;

/// A fresh `SMK-XXXXXX` code of uppercase letters and digits
pub fn generate_reward_code() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(REWARD_CODE_LEN)
        .map(char::from)
        .collect();
    format!("{}{}", REWARD_CODE_PREFIX, suffix.to_uppercase())
}
