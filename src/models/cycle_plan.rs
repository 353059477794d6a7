use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::athlete_profile::Lift;
use super::workout_session::Week;

/// Per-athlete position in the 4-week block, one entry per lift. Stored at
/// `athletes/{id}/plans`; lifts the athlete has not started default to
/// week one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CyclePlan {
    #[serde(default)]
    pub weeks: HashMap<Lift, u8>,
}

impl CyclePlan {
    pub fn current_week(&self, lift: Lift) -> Week {
        self.weeks
            .get(&lift)
            .copied()
            .and_then(Week::from_number)
            .unwrap_or(Week::One)
    }

    pub fn set_week(&mut self, lift: Lift, week: Week) {
        self.weeks.insert(lift, week.number());
    }
}
