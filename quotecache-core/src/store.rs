use async_trait::async_trait;
use thiserror::Error;

use quotecache_types::{Favorite, QuoteRecord};

/// Failure reported by a persistence backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not be reached or rejected the operation.
    #[error("backend error: {0}")]
    Backend(String),
    /// A stored item could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Key-value persistence for cached quote records, keyed by symbol.
///
/// `put` is a last-write-wins overwrite; concurrent writers of the same
/// symbol need no coordination beyond what the backend provides.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Load the record for `symbol`, or `None` when nothing is cached.
    async fn get(&self, symbol: &str) -> Result<Option<QuoteRecord>, StoreError>;

    /// Store `record` under its symbol, replacing any previous record.
    async fn put(&self, record: &QuoteRecord) -> Result<(), StoreError>;
}

/// Persistence for per-user favorite symbols, keyed by `(user_id, symbol)`.
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// All favorites of `user_id`.
    async fn list(&self, user_id: &str) -> Result<Vec<Favorite>, StoreError>;

    /// Insert or replace a favorite.
    async fn put(&self, favorite: &Favorite) -> Result<(), StoreError>;

    /// Remove a favorite. Removing an absent favorite succeeds.
    async fn delete(&self, user_id: &str, symbol: &str) -> Result<(), StoreError>;
}
