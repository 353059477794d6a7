use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::CoreConfig;
use crate::errors::CoreError;
use crate::models::{AthleteId, CreateWorkoutSession, Lift, WorkoutSession};
use crate::services::prescription::estimate_one_rep_max;
use crate::store::{DocKey, DocumentStore, StampedDocument, StoreError};

/// Result of an append attempt. `NotRecorded` means the store was
/// unreachable and the caller should offer a retry; it is not an error,
/// the session simply does not exist.
#[derive(Debug)]
pub enum AppendOutcome {
    Recorded(WorkoutSession),
    NotRecorded,
}

/// Append-only ledger of executed workout sessions, one collection per
/// athlete. Also the authority for PR detection: a session is a PR iff its
/// estimate strictly exceeds the best estimate among the sessions recorded
/// before it, within the lookback window.
pub struct SessionLedgerService {
    store: Arc<dyn DocumentStore>,
    config: CoreConfig,
}

impl SessionLedgerService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_config(store, CoreConfig::default())
    }

    pub fn with_config(store: Arc<dyn DocumentStore>, config: CoreConfig) -> Self {
        Self { store, config }
    }

    /// Derives the one-rep-max estimate and PR flag, then persists the
    /// session with a server-assigned timestamp. Scope authorization is
    /// the store's call; a denial surfaces as `Permission`.
    pub async fn append(
        &self,
        athlete_id: &AthleteId,
        session_data: CreateWorkoutSession,
    ) -> Result<AppendOutcome, CoreError> {
        let estimate = estimate_one_rep_max(session_data.amrap.weight, session_data.amrap.reps);
        let best = match self
            .best_estimate(athlete_id, session_data.lift, self.config.pr_lookback)
            .await
        {
            Ok(best) => best,
            Err(CoreError::Write(StoreError::Unavailable)) => {
                warn!(athlete = %athlete_id, "store unavailable, session not recorded");
                return Ok(AppendOutcome::NotRecorded);
            }
            Err(e) => return Err(e),
        };
        let pr = estimate > best;

        let doc = json!({
            "athlete_id": athlete_id,
            "lift": session_data.lift,
            "week": session_data.week.number(),
            "unit": session_data.unit,
            "training_max": session_data.training_max,
            "warmups": session_data.warmups,
            "work": session_data.work,
            "amrap": session_data.amrap,
            "estimated_one_rep_max": estimate,
            "note": session_data.note,
            "pr": pr,
        });

        match self.store.add(&DocKey::sessions(athlete_id), doc).await {
            Ok(stamped) => {
                info!(
                    athlete = %athlete_id,
                    lift = session_data.lift.as_str(),
                    estimate,
                    pr,
                    "recorded workout session"
                );
                Ok(AppendOutcome::Recorded(Self::from_stamped(stamped)?))
            }
            Err(StoreError::Unavailable) => {
                warn!(athlete = %athlete_id, "store unavailable, session not recorded");
                Ok(AppendOutcome::NotRecorded)
            }
            Err(StoreError::PermissionDenied(_)) => Err(CoreError::Permission),
            Err(e) => Err(CoreError::Write(e)),
        }
    }

    /// Most recent `limit` sessions, newest first, optionally filtered to
    /// one lift. The store cannot filter, so one unfiltered page is
    /// fetched and filtered in memory; sessions past that page are not
    /// visible to callers.
    pub async fn recent(
        &self,
        athlete_id: &AthleteId,
        lift: Option<Lift>,
        limit: usize,
    ) -> Result<Vec<WorkoutSession>, CoreError> {
        let page = self
            .store
            .query_recent(&DocKey::sessions(athlete_id), self.config.fetch_page)
            .await
            .map_err(Self::read_error)?;

        let mut sessions = Vec::new();
        for stamped in page {
            if sessions.len() == limit {
                break;
            }
            let session = Self::from_stamped(stamped)?;
            if lift.map_or(true, |l| session.lift == l) {
                sessions.push(session);
            }
        }
        Ok(sessions)
    }

    /// Best estimate among the most recent `lookback` sessions for the
    /// lift; zero when none exist.
    pub async fn best_estimate(
        &self,
        athlete_id: &AthleteId,
        lift: Lift,
        lookback: usize,
    ) -> Result<f64, CoreError> {
        let sessions = self.recent(athlete_id, Some(lift), lookback).await?;
        Ok(sessions
            .iter()
            .map(|s| s.estimated_one_rep_max)
            .fold(0.0, f64::max))
    }

    /// Whether a page-visible session for the lift was recorded on
    /// `today`. Recomputed per call; the page cap bounds the scan.
    pub async fn completed_today(
        &self,
        athlete_id: &AthleteId,
        lift: Lift,
        today: NaiveDate,
    ) -> Result<bool, CoreError> {
        let sessions = self
            .recent(athlete_id, Some(lift), self.config.fetch_page)
            .await?;
        Ok(sessions.iter().any(|s| s.created_at.date_naive() == today))
    }

    fn read_error(err: StoreError) -> CoreError {
        match err {
            StoreError::PermissionDenied(_) => CoreError::Permission,
            other => CoreError::Write(other),
        }
    }

    /// The stored document carries neither id nor timestamp; both live on
    /// the stamp and are folded back in before decoding.
    fn from_stamped(stamped: StampedDocument) -> Result<WorkoutSession, CoreError> {
        let mut doc = stamped.doc;
        if let Some(fields) = doc.as_object_mut() {
            fields.insert("id".to_string(), json!(stamped.id));
            fields.insert("created_at".to_string(), json!(stamped.created_at));
        }
        Ok(serde_json::from_value(doc)?)
    }
}
