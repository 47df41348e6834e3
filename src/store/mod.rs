//! TTL key-value store capability interface
//!
//! Repositories hold a reference to a [`TtlStore`] rather than any concrete
//! client, so the backing store is swappable and testable with the in-memory
//! implementation.

pub mod keys;
pub mod memory;
pub mod redis;

pub use memory::InMemoryTtlStore;
pub use self::redis::RedisTtlStore;

use std::time::Duration;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("store connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Narrow capability surface over an external ephemeral store.
///
/// `list` is the read side of `append`. Every mutation takes the TTL so the
/// entry slides back to the full window on each write; `expire` refreshes it
/// on read paths.
#[async_trait]
pub trait TtlStore: Send + Sync {
    /// Fetch a scalar value. `None` means absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Set a scalar value with the given TTL, replacing any prior value.
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), StoreError>;

    /// Append one item to the ordered list at `key`, refreshing its TTL.
    async fn append(&self, key: &str, item: &[u8], ttl: Duration) -> Result<(), StoreError>;

    /// Return all items of the list at `key` in append order; empty when the
    /// key is absent or expired.
    async fn list(&self, key: &str) -> Result<Vec<Vec<u8>>, StoreError>;

    /// Reset the TTL of `key` to the full window. Returns false when the key
    /// is absent or expired.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, StoreError>;

    /// Connectivity check used by the readiness probe.
    async fn ping(&self) -> Result<(), StoreError>;
}
