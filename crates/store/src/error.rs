use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{collection}/{id} not found")]
    NotFound { collection: String, id: String },

    /// A conditional write lost against a concurrent writer
    #[error("{collection}/{id} was modified concurrently (expected revision {expected}, found {actual})")]
    Conflict {
        collection: String,
        id: String,
        expected: u64,
        actual: u64,
    },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
