//! Contact persistence.
//!
//! The handler only sees [`ContactStore`]; the PostgreSQL implementation
//! lives in [`postgres`]. The store owns the record identity: it assigns the
//! id and creation timestamp and hands them back.

pub mod postgres;

use async_trait::async_trait;

use crate::contact::{ContactSubmission, StoredContact};

pub use postgres::PgContactStore;

/// Errors raised by a store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A sink for validated contact submissions.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Insert a single submission and return the assigned identity.
    async fn insert_contact(&self, submission: &ContactSubmission) -> Result<StoredContact, StoreError>;
}
