// Document-store collaborator boundary. The core only ever needs point
// reads/writes by key, append-with-server-timestamp, and an ordered,
// limited, filter-free query.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::models::AthleteId;

/// Path into the athlete-scoped document hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocKey(String);

impl DocKey {
    pub fn profile(athlete: &AthleteId) -> Self {
        Self(format!("athletes/{athlete}/profile"))
    }

    pub fn sessions(athlete: &AthleteId) -> Self {
        Self(format!("athletes/{athlete}/sessions"))
    }

    pub fn plans(athlete: &AthleteId) -> Self {
        Self(format!("athletes/{athlete}/plans"))
    }

    pub fn attendance(team: &str) -> Self {
        Self(format!("attendance/{team}"))
    }

    pub fn roles(user: &str) -> Self {
        Self(format!("roles/{user}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A document handed back by the store, wrapped with its server-assigned
/// id and creation timestamp.
#[derive(Debug, Clone)]
pub struct StampedDocument {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub doc: Value,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("document store unavailable")]
    Unavailable,
    #[error("store rules denied access to {0}")]
    PermissionDenied(String),
    #[error("store backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Remote document store as seen by the core. Merge semantics: top-level
/// fields of an existing document are merged, container values are
/// replaced wholesale.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point read. `Ok(None)` means confirmed absent, distinct from a
    /// failed read.
    async fn get(&self, key: &DocKey) -> Result<Option<Value>, StoreError>;

    /// Whole-document write with top-level merge into any existing doc.
    async fn set_merge(&self, key: &DocKey, doc: Value) -> Result<(), StoreError>;

    /// Append to a collection. The store assigns the id and a strictly
    /// monotonic creation timestamp.
    async fn add(&self, collection: &DocKey, doc: Value) -> Result<StampedDocument, StoreError>;

    /// Most recent `limit` documents, ordered by creation time descending.
    /// No composite filters; callers filter in memory.
    async fn query_recent(
        &self,
        collection: &DocKey,
        limit: usize,
    ) -> Result<Vec<StampedDocument>, StoreError>;
}
