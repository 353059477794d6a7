use std::sync::Arc;
use tracing::{info, warn};

use crate::errors::CoreError;
use crate::models::AttendanceSheet;
use crate::store::{DocKey, DocumentStore};

/// Loads and saves team attendance sheets. Structural edits happen on the
/// sheet itself; this service owns the persistence round-trips. A sheet is
/// one document, written whole, so concurrent coaches resolve
/// last-save-wins rather than interleaving partial updates.
pub struct AttendanceService {
    store: Arc<dyn DocumentStore>,
}

impl AttendanceService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The team's sheet, or a fresh empty one on first load. A load
    /// failure surfaces for this team only; other teams' sheets are
    /// unaffected.
    pub async fn load_or_init(&self, team: &str) -> Result<AttendanceSheet, CoreError> {
        match self.store.get(&DocKey::attendance(team)).await {
            Ok(Some(doc)) => Ok(serde_json::from_value(doc)?),
            Ok(None) => {
                info!(team, "no sheet yet, starting empty");
                Ok(AttendanceSheet::new(team))
            }
            Err(e) => {
                warn!(team, error = %e, "sheet load failed");
                Err(CoreError::Load(e))
            }
        }
    }

    /// Persists the whole sheet, then reloads and replaces the local copy
    /// with the persisted version so any server-side normalization is
    /// reconciled. On failure the local edits are left untouched for
    /// retry.
    pub async fn save(&self, sheet: &mut AttendanceSheet) -> Result<(), CoreError> {
        let key = DocKey::attendance(&sheet.team);
        let doc = serde_json::to_value(&*sheet)?;

        if let Err(e) = self.store.set_merge(&key, doc).await {
            warn!(team = %sheet.team, error = %e, "sheet save failed, local edits kept");
            return Err(CoreError::Save(e));
        }

        match self.store.get(&key).await {
            Ok(Some(doc)) => {
                *sheet = serde_json::from_value(doc)?;
                info!(team = %sheet.team, dates = sheet.dates.len(), athletes = sheet.athletes.len(), "sheet saved");
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                warn!(team = %sheet.team, error = %e, "post-save reload failed, local edits kept");
                Err(CoreError::Save(e))
            }
        }
    }
}
