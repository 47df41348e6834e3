//! Job lifecycle metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle status of a job. An expired job is never observed directly;
/// expiry manifests as the record being gone from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Created,
    Streaming,
    Completed,
    Expired,
}

/// One document-verification session's ephemeral state container.
///
/// `processed`/`total` are the last persisted progress snapshot, so a
/// reconnecting session can resume accounting where the previous one left
/// off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub processed: u32,
    pub total: u32,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Job {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            status: JobStatus::Created,
            processed: 0,
            total: 0,
            created_at: now,
            last_activity: now,
        }
    }
}
