//! In-memory TTL store
//!
//! Backs tests and redis-less deployments. Deadlines use the tokio clock, so
//! expiry behavior is exercisable under paused time.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::store::{StoreError, TtlStore};

#[derive(Debug, Clone)]
enum Value {
    Scalar(Vec<u8>),
    List(Vec<Vec<u8>>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    deadline: Instant,
}

impl Entry {
    fn is_live(&self) -> bool {
        Instant::now() < self.deadline
    }
}

/// HashMap-backed [`TtlStore`] with lazy per-access expiry
#[derive(Default)]
pub struct InMemoryTtlStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryTtlStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TtlStore for InMemoryTtlStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.is_live() => match &entry.value {
                Value::Scalar(data) => Ok(Some(data.clone())),
                Value::List(_) => Ok(None),
            },
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            Entry {
                value: Value::Scalar(value.to_vec()),
                deadline: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn append(&self, key: &str, item: &[u8], ttl: Duration) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        let deadline = Instant::now() + ttl;
        match entries.get_mut(key) {
            Some(entry) if entry.is_live() => {
                if let Value::List(items) = &mut entry.value {
                    items.push(item.to_vec());
                } else {
                    entry.value = Value::List(vec![item.to_vec()]);
                }
                entry.deadline = deadline;
            }
            _ => {
                entries.insert(
                    key.to_string(),
                    Entry {
                        value: Value::List(vec![item.to_vec()]),
                        deadline,
                    },
                );
            }
        }
        Ok(())
    }

    async fn list(&self, key: &str) -> Result<Vec<Vec<u8>>, StoreError> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.is_live() => match &entry.value {
                Value::List(items) => Ok(items.clone()),
                Value::Scalar(_) => Ok(Vec::new()),
            },
            Some(_) => {
                entries.remove(key);
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().await;
        match entries.get_mut(key) {
            Some(entry) if entry.is_live() => {
                entry.deadline = Instant::now() + ttl;
                Ok(true)
            }
            Some(_) => {
                entries.remove(key);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
