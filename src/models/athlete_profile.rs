use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Externally issued athlete/coach identifier. The identity provider owns
/// the format; the core only carries it around.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AthleteId(String);

impl AthleteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AthleteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AthleteId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Unit system the athlete lifts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Lb,
    Kg,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Lb => "lb",
            Unit::Kg => "kg",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lb" => Some(Unit::Lb),
            "kg" => Some(Unit::Kg),
            _ => None,
        }
    }

    /// Smallest load change a loaded barbell can make in this unit system.
    pub fn default_increment(&self) -> f64 {
        match self {
            Unit::Lb => 5.0,
            Unit::Kg => 2.5,
        }
    }
}

/// The four tracked barbell lifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lift {
    Bench,
    Squat,
    Deadlift,
    Press,
}

impl Lift {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lift::Bench => "bench",
            Lift::Squat => "squat",
            Lift::Deadlift => "deadlift",
            Lift::Press => "press",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bench" => Some(Lift::Bench),
            "squat" => Some(Lift::Squat),
            "deadlift" => Some(Lift::Deadlift),
            "press" => Some(Lift::Press),
            _ => None,
        }
    }

    pub fn is_upper_body(&self) -> bool {
        matches!(self, Lift::Bench | Lift::Press)
    }

    pub const ALL: [Lift; 4] = [Lift::Bench, Lift::Squat, Lift::Deadlift, Lift::Press];
}

/// Per-lift training maxes. A missing entry means the athlete has not set
/// one for that lift yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMaxes {
    pub bench: Option<f64>,
    pub squat: Option<f64>,
    pub deadlift: Option<f64>,
    pub press: Option<f64>,
}

impl TrainingMaxes {
    pub fn get(&self, lift: Lift) -> Option<f64> {
        match lift {
            Lift::Bench => self.bench,
            Lift::Squat => self.squat,
            Lift::Deadlift => self.deadlift,
            Lift::Press => self.press,
        }
    }

    pub fn set(&mut self, lift: Lift, value: f64) {
        let slot = match lift {
            Lift::Bench => &mut self.bench,
            Lift::Squat => &mut self.squat,
            Lift::Deadlift => &mut self.deadlift,
            Lift::Press => &mut self.press,
        };
        *slot = Some(value);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteProfile {
    pub athlete_id: AthleteId,
    pub first_name: String,
    pub last_name: String,
    pub unit: Unit,
    pub training_maxes: TrainingMaxes,
    pub team: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AthleteProfile {
    /// Fresh profile as created on first sign-in: pounds, no maxes, no team.
    pub fn new(athlete_id: AthleteId, first_name: &str, last_name: &str) -> Self {
        let now = Utc::now();
        Self {
            athlete_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            unit: Unit::Lb,
            training_maxes: TrainingMaxes::default(),
            team: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
