use store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoyaltyError {
    #[error("Insufficient points: reward costs {required}, balance is {available}")]
    InsufficientPoints { required: u64, available: u64 },

    #[error("Unknown reward: {0}")]
    UnknownReward(String),

    #[error("Unknown achievement: {0}")]
    UnknownAchievement(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl LoyaltyError {
    /// True when a concurrent writer changed the profile first
    pub fn is_conflict(&self) -> bool {
        matches!(self, LoyaltyError::Store(e) if e.is_conflict())
    }
}

pub type Result<T> = std::result::Result<T, LoyaltyError>;
