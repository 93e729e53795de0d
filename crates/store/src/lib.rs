//! # Store Crate
//!
//! Document persistence for the restaurant services.
//!
//! ## Main Components
//!
//! - **traits**: `DocumentStore` and `BlobStore`, the seams every service uses
//! - **document**: `Document`, `Query` and JSON conversion helpers
//! - **memory**: `MemoryStore`, an in-memory store that snapshots to a JSON file
//! - **blob**: In-memory and directory-backed blob stores for gallery media
//! - **error**: Error types for store operations
//!
//! ## Example Usage
//!
//! ```ignore
//! use store::{DocumentStore, MemoryStore, Query};
//!
//! let store = MemoryStore::load(Path::new("smokeville.json")).await?;
//! let id = store.insert("newsletter", json!({"email": "a@b.co"})).await?;
//! let pending = store.query("orders", &Query::new().where_eq("status", "pending")).await?;
//! store.save(Path::new("smokeville.json")).await?;
//! ```

pub mod blob;
pub mod document;
pub mod error;
pub mod memory;
pub mod traits;

pub use blob::{DirBlobStore, MemoryBlobStore};
pub use document::{decode_all, to_fields, Direction, Document, Filter, Query};
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use traits::{BlobStore, DocumentStore};

/// Collection names shared by the services
pub mod collections {
    pub const USERS: &str = "users";
    pub const ORDERS: &str = "orders";
    pub const BOOKINGS: &str = "bookings";
    pub const REVIEWS: &str = "reviews";
    pub const LOYALTY: &str = "loyalty";
    pub const GALLERY: &str = "gallery";
    pub const NEWSLETTER: &str = "newsletter";
    pub const MENU: &str = "menu";
}
