use std::sync::Arc;
use tracing::info;

use crate::errors::CoreError;
use crate::models::{AthleteId, CyclePlan, Lift, Week};
use crate::services::prescription::cycle_increment;
use crate::services::profile_service::ProfileService;
use crate::store::{DocKey, DocumentStore, StoreError};

/// Tracks each athlete's position in the 4-week block, one slot per lift.
/// Advancing off the deload week wraps to week one and bumps the stored
/// training max by the conventional cycle increment.
pub struct PlanService {
    store: Arc<dyn DocumentStore>,
    profiles: ProfileService,
}

impl PlanService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let profiles = ProfileService::new(store.clone());
        Self { store, profiles }
    }

    pub async fn plan(&self, athlete_id: &AthleteId) -> Result<CyclePlan, CoreError> {
        match self.store.get(&DocKey::plans(athlete_id)).await {
            Ok(Some(doc)) => Ok(serde_json::from_value(doc)?),
            Ok(None) => Ok(CyclePlan::default()),
            Err(e) => Err(Self::map_store_error(e)),
        }
    }

    pub async fn current_week(&self, athlete_id: &AthleteId, lift: Lift) -> Result<Week, CoreError> {
        Ok(self.plan(athlete_id).await?.current_week(lift))
    }

    /// Moves the lift to the next week and persists the plan. On the
    /// deload-to-week-one wrap, the lift's training max is bumped if one
    /// is set.
    pub async fn advance_week(&self, athlete_id: &AthleteId, lift: Lift) -> Result<Week, CoreError> {
        let mut plan = self.plan(athlete_id).await?;
        let current = plan.current_week(lift);
        let next = current.next();
        plan.set_week(lift, next);

        self.store
            .set_merge(&DocKey::plans(athlete_id), serde_json::to_value(&plan)?)
            .await
            .map_err(Self::map_store_error)?;

        if current.is_deload() {
            if let Some(profile) = self.profiles.get(athlete_id).await? {
                if let Some(max) = profile.training_maxes.get(lift) {
                    let bumped = max + cycle_increment(lift, profile.unit);
                    self.profiles
                        .save_training_max(athlete_id, lift, bumped)
                        .await?;
                    info!(
                        athlete = %athlete_id,
                        lift = lift.as_str(),
                        from = max,
                        to = bumped,
                        "cycle complete, training max bumped"
                    );
                }
            }
        }

        Ok(next)
    }

    fn map_store_error(err: StoreError) -> CoreError {
        match err {
            StoreError::PermissionDenied(_) => CoreError::Permission,
            other => CoreError::Write(other),
        }
    }
}
