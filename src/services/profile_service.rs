use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::errors::CoreError;
use crate::models::{AthleteId, AthleteProfile, Lift, Unit};
use crate::store::{DocKey, DocumentStore, StoreError};

/// Athlete profile reads and field-level updates. Profiles are created on
/// first sign-in and only ever mutated, never hard-deleted here.
pub struct ProfileService {
    store: Arc<dyn DocumentStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, athlete_id: &AthleteId) -> Result<Option<AthleteProfile>, CoreError> {
        match self.store.get(&DocKey::profile(athlete_id)).await {
            Ok(Some(doc)) => Ok(Some(serde_json::from_value(doc)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(Self::map_store_error(e)),
        }
    }

    /// The athlete's profile, creating and persisting a fresh one on first
    /// sign-in.
    pub async fn get_or_create(
        &self,
        athlete_id: &AthleteId,
        first_name: &str,
        last_name: &str,
    ) -> Result<AthleteProfile, CoreError> {
        if let Some(profile) = self.get(athlete_id).await? {
            return Ok(profile);
        }
        let profile = AthleteProfile::new(athlete_id.clone(), first_name, last_name);
        self.write_merge(athlete_id, serde_json::to_value(&profile)?).await?;
        info!(athlete = %athlete_id, "created profile on first sign-in");
        Ok(profile)
    }

    /// Saves one lift's training max. The value scales every prescribed
    /// load for the cycle, so it is written eagerly rather than batched.
    pub async fn save_training_max(
        &self,
        athlete_id: &AthleteId,
        lift: Lift,
        value: f64,
    ) -> Result<AthleteProfile, CoreError> {
        self.update(athlete_id, |profile| {
            profile.training_maxes.set(lift, value);
        })
        .await
    }

    pub async fn set_unit(
        &self,
        athlete_id: &AthleteId,
        unit: Unit,
    ) -> Result<AthleteProfile, CoreError> {
        self.update(athlete_id, |profile| profile.unit = unit).await
    }

    pub async fn set_team(
        &self,
        athlete_id: &AthleteId,
        team: Option<String>,
    ) -> Result<AthleteProfile, CoreError> {
        self.update(athlete_id, |profile| profile.team = team).await
    }

    async fn update(
        &self,
        athlete_id: &AthleteId,
        apply: impl FnOnce(&mut AthleteProfile),
    ) -> Result<AthleteProfile, CoreError> {
        let mut profile = self
            .get(athlete_id)
            .await?
            .unwrap_or_else(|| AthleteProfile::new(athlete_id.clone(), "", ""));
        apply(&mut profile);
        profile.updated_at = Utc::now();
        self.write_merge(athlete_id, serde_json::to_value(&profile)?).await?;
        Ok(profile)
    }

    async fn write_merge(
        &self,
        athlete_id: &AthleteId,
        doc: serde_json::Value,
    ) -> Result<(), CoreError> {
        self.store
            .set_merge(&DocKey::profile(athlete_id), doc)
            .await
            .map_err(Self::map_store_error)
    }

    fn map_store_error(err: StoreError) -> CoreError {
        match err {
            StoreError::PermissionDenied(_) => CoreError::Permission,
            other => CoreError::Write(other),
        }
    }
}
