use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::athlete_profile::{AthleteId, Lift, Unit};

/// Position within the 4-week periodization block. Week four is the deload
/// week and carries no AMRAP set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Week {
    One,
    Two,
    Three,
    Deload,
}

impl Week {
    /// Checked conversion from a user-supplied week number.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Week::One),
            2 => Some(Week::Two),
            3 => Some(Week::Three),
            4 => Some(Week::Deload),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Week::One => 1,
            Week::Two => 2,
            Week::Three => 3,
            Week::Deload => 4,
        }
    }

    pub fn is_deload(&self) -> bool {
        matches!(self, Week::Deload)
    }

    /// Weeks 1-3 end in an AMRAP set; the deload week does not.
    pub fn has_amrap(&self) -> bool {
        !self.is_deload()
    }

    /// Next week in the block, wrapping deload back to week one.
    pub fn next(&self) -> Self {
        match self {
            Week::One => Week::Two,
            Week::Two => Week::Three,
            Week::Three => Week::Deload,
            Week::Deload => Week::One,
        }
    }
}

/// One prescribed set row: percentage of training max, plate-rounded
/// weight, and the rep target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescribedSet {
    pub percent: f64,
    pub weight: f64,
    pub target_reps: u32,
    pub amrap: bool,
}

/// What actually happened on the AMRAP set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmrapResult {
    pub weight: f64,
    pub reps: u32,
}

/// An executed workout, immutable once recorded. `id` and `created_at` are
/// assigned by the document store on append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: String,
    pub athlete_id: AthleteId,
    pub lift: Lift,
    pub week: u8,
    pub unit: Unit,
    pub training_max: f64,
    pub warmups: Vec<PrescribedSet>,
    pub work: Vec<PrescribedSet>,
    pub amrap: AmrapResult,
    pub estimated_one_rep_max: f64,
    pub note: Option<String>,
    pub pr: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a session. The estimate and PR flag are derived by
/// the ledger, never supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkoutSession {
    pub lift: Lift,
    pub week: Week,
    pub unit: Unit,
    pub training_max: f64,
    pub warmups: Vec<PrescribedSet>,
    pub work: Vec<PrescribedSet>,
    pub amrap: AmrapResult,
    pub note: Option<String>,
}
