use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::RwLock;

use super::{DocKey, DocumentStore, StampedDocument, StoreError};

/// In-memory document store. Backs the test suite and lets an embedding
/// UI run in demo mode without a remote store.
pub struct MemoryStore {
    docs: RwLock<HashMap<String, Value>>,
    collections: RwLock<HashMap<String, Vec<StampedDocument>>>,
    last_stamp: Mutex<DateTime<Utc>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
            collections: RwLock::new(HashMap::new()),
            last_stamp: Mutex::new(Utc::now()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Server timestamps must be strictly monotonic so that "ordered by
    /// creation time" is a total order within a collection.
    fn next_timestamp(&self) -> DateTime<Utc> {
        let mut last = self.last_stamp.lock().expect("timestamp lock poisoned");
        let now = Utc::now();
        let floor = *last + Duration::microseconds(1);
        let stamp = if now > floor { now } else { floor };
        *last = stamp;
        stamp
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, key: &DocKey) -> Result<Option<Value>, StoreError> {
        let docs = self.docs.read().await;
        Ok(docs.get(key.as_str()).cloned())
    }

    async fn set_merge(&self, key: &DocKey, doc: Value) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        let slot = docs.entry(key.as_str().to_string()).or_insert(Value::Null);
        match (slot, doc) {
            (Value::Object(existing), Value::Object(incoming)) => {
                for (field, value) in incoming {
                    existing.insert(field, value);
                }
            }
            (slot, doc) => *slot = doc,
        }
        tracing::debug!(key = %key, "merged document");
        Ok(())
    }

    async fn add(&self, collection: &DocKey, doc: Value) -> Result<StampedDocument, StoreError> {
        let stamped = StampedDocument {
            id: format!("doc-{:08}", self.next_id.fetch_add(1, Ordering::Relaxed)),
            created_at: self.next_timestamp(),
            doc,
        };
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.as_str().to_string())
            .or_default()
            .push(stamped.clone());
        tracing::debug!(collection = %collection, id = %stamped.id, "appended document");
        Ok(stamped)
    }

    async fn query_recent(
        &self,
        collection: &DocKey,
        limit: usize,
    ) -> Result<Vec<StampedDocument>, StoreError> {
        let collections = self.collections.read().await;
        let docs = collections
            .get(collection.as_str())
            .map(|entries| entries.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default();
        Ok(docs)
    }
}
