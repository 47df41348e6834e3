//! Redis-backed TTL store

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};

use crate::store::{StoreError, TtlStore};

// Environment variable names
const ENV_REDIS_HOST: &str = "PAPERTRAIL_REDIS_HOST";
const ENV_REDIS_PORT: &str = "PAPERTRAIL_REDIS_PORT";
const ENV_REDIS_PASSWORD: &str = "PAPERTRAIL_REDIS_PASSWORD";
const ENV_REDIS_DB: &str = "PAPERTRAIL_REDIS_DB";

// Default values
const DEFAULT_REDIS_HOST: &str = "127.0.0.1";
const DEFAULT_REDIS_PORT: &str = "6379";
const DEFAULT_REDIS_DB: &str = "0";

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::Connection(err.to_string())
    }
}

/// Redis implementation of the [`TtlStore`] capability
#[derive(Clone)]
pub struct RedisTtlStore {
    client: Client,
}

impl RedisTtlStore {
    /// Create a new store instance and verify the connection
    ///
    /// Configuration via environment variables:
    /// - `PAPERTRAIL_REDIS_HOST` - Redis host (default: 127.0.0.1)
    /// - `PAPERTRAIL_REDIS_PORT` - Redis port (default: 6379)
    /// - `PAPERTRAIL_REDIS_PASSWORD` - Redis password (default: none)
    /// - `PAPERTRAIL_REDIS_DB` - Redis database number (default: 0)
    pub async fn new() -> Result<Self, StoreError> {
        let host = env::var(ENV_REDIS_HOST).unwrap_or_else(|_| DEFAULT_REDIS_HOST.to_string());
        let port = env::var(ENV_REDIS_PORT).unwrap_or_else(|_| DEFAULT_REDIS_PORT.to_string());
        let password = env::var(ENV_REDIS_PASSWORD).ok();
        let db = env::var(ENV_REDIS_DB).unwrap_or_else(|_| DEFAULT_REDIS_DB.to_string());

        // Build Redis URL: redis://[password@]host:port/db
        let redis_url = match password {
            Some(pwd) if !pwd.is_empty() => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
            _ => format!("redis://{}:{}/{}", host, port, db),
        };

        tracing::debug!(host = %host, port = %port, db = %db, "Connecting to Redis");

        let client = Client::open(redis_url)?;

        // Fail fast if Redis is unreachable
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        tracing::info!(host = %host, port = %port, "Redis connection established");

        Ok(Self { client })
    }

    async fn conn(&self) -> Result<MultiplexedConnection, StoreError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl TtlStore for RedisTtlStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut conn = self.conn().await?;
        let data: Option<Vec<u8>> = conn.get(key).await?;
        Ok(data)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        let _: () = conn.set_ex(key, value, ttl.as_secs()).await?;
        Ok(())
    }

    async fn append(&self, key: &str, item: &[u8], ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        let _: () = conn.rpush(key, item).await?;
        let _: bool = conn.expire(key, ttl.as_secs() as i64).await?;
        Ok(())
    }

    async fn list(&self, key: &str) -> Result<Vec<Vec<u8>>, StoreError> {
        let mut conn = self.conn().await?;
        let items: Vec<Vec<u8>> = conn.lrange(key, 0, -1).await?;
        Ok(items)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        let mut conn = self.conn().await?;
        let refreshed: bool = conn.expire(key, ttl.as_secs() as i64).await?;
        Ok(refreshed)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
