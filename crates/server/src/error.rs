use domain::DomainError;
use loyalty::LoyaltyError;
use store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("This email is already subscribed to our newsletter")]
    DuplicateSubscription(String),

    #[error("Cannot move {kind} from {from} to {to}")]
    InvalidTransition {
        kind: &'static str,
        from: String,
        to: String,
    },

    #[error("Only {available} seats left for that slot, {requested} requested")]
    CapacityExceeded { requested: u32, available: u32 },

    #[error("Payment failed: {0}")]
    Payment(String),

    #[error("User {0} is not an administrator")]
    Forbidden(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Loyalty error: {0}")]
    Loyalty(#[from] LoyaltyError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn not_found(kind: &'static str, id: &str) -> Self {
        ServiceError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
