use thiserror::Error;

use crate::store::StoreError;

/// Failure taxonomy surfaced to the UI layer. Pure calculators never fail;
/// everything here originates at a persistence round-trip or an attendance
/// structural edit.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("write rejected by the document store: {0}")]
    Write(#[source] StoreError),
    #[error("attendance save failed, local edits kept: {0}")]
    Save(#[source] StoreError),
    #[error("attendance sheet failed to load: {0}")]
    Load(#[source] StoreError),
    #[error("date {0} already exists on this sheet")]
    DuplicateDate(String),
    #[error("caller is not authorized for this scope")]
    Permission,
    #[error("stored document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}
