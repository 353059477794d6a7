// Shared test fixtures: an in-memory store plus failure-mode doubles for
// the document-store collaborator.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use liftcycle::models::{
    AmrapResult, AthleteId, CreateWorkoutSession, Lift, Unit, Week,
};
use liftcycle::services::prescription::prescribe;
use liftcycle::store::{DocKey, DocumentStore, MemoryStore, StampedDocument, StoreError};

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

/// A session input as the UI would submit it: prescription rows from the
/// calculator, AMRAP outcome from the athlete.
pub fn session_with_amrap(lift: Lift, week: Week, training_max: f64, amrap: AmrapResult) -> CreateWorkoutSession {
    let prescription = prescribe(training_max, week, Unit::Lb);
    CreateWorkoutSession {
        lift,
        week,
        unit: Unit::Lb,
        training_max,
        warmups: prescription.warmups,
        work: prescription.work,
        amrap,
        note: None,
    }
}

/// Bench session whose estimate comes out exactly at `estimate` (zero-rep
/// AMRAP degrades the estimate to the bar weight).
pub fn bench_session_estimating(estimate: f64) -> CreateWorkoutSession {
    session_with_amrap(
        Lift::Bench,
        Week::One,
        200.0,
        AmrapResult { weight: estimate, reps: 0 },
    )
}

pub fn athlete(id: &str) -> AthleteId {
    AthleteId::new(id)
}

/// Store that is unreachable: every call fails with `Unavailable`.
pub struct UnavailableStore;

#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn get(&self, _key: &DocKey) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn set_merge(&self, _key: &DocKey, _doc: Value) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn add(&self, _collection: &DocKey, _doc: Value) -> Result<StampedDocument, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn query_recent(
        &self,
        _collection: &DocKey,
        _limit: usize,
    ) -> Result<Vec<StampedDocument>, StoreError> {
        Err(StoreError::Unavailable)
    }
}

/// Store whose rules reject every access, as they would for a caller
/// outside the athlete's scope.
pub struct DenyingStore;

#[async_trait]
impl DocumentStore for DenyingStore {
    async fn get(&self, key: &DocKey) -> Result<Option<Value>, StoreError> {
        Err(StoreError::PermissionDenied(key.to_string()))
    }

    async fn set_merge(&self, key: &DocKey, _doc: Value) -> Result<(), StoreError> {
        Err(StoreError::PermissionDenied(key.to_string()))
    }

    async fn add(&self, collection: &DocKey, _doc: Value) -> Result<StampedDocument, StoreError> {
        Err(StoreError::PermissionDenied(collection.to_string()))
    }

    async fn query_recent(
        &self,
        collection: &DocKey,
        _limit: usize,
    ) -> Result<Vec<StampedDocument>, StoreError> {
        Err(StoreError::PermissionDenied(collection.to_string()))
    }
}

/// Reads succeed, writes fail: exercises "save failed, edits kept".
pub struct ReadOnlyStore {
    pub inner: Arc<MemoryStore>,
}

#[async_trait]
impl DocumentStore for ReadOnlyStore {
    async fn get(&self, key: &DocKey) -> Result<Option<Value>, StoreError> {
        self.inner.get(key).await
    }

    async fn set_merge(&self, _key: &DocKey, _doc: Value) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn add(&self, _collection: &DocKey, _doc: Value) -> Result<StampedDocument, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn query_recent(
        &self,
        collection: &DocKey,
        limit: usize,
    ) -> Result<Vec<StampedDocument>, StoreError> {
        self.inner.query_recent(collection, limit).await
    }
}
