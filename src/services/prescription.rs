//! Load prescription tables, plate rounding, and one-rep-max estimation
//! for the 4-week block.

use serde::{Deserialize, Serialize};

use crate::models::{Lift, PrescribedSet, Unit, Week};

/// Epley-style rep coefficient used by the one-rep-max estimate.
const REP_COEFFICIENT: f64 = 0.0333;

/// Warmup scheme, identical for every week: percent of training max and
/// rep target.
const WARMUP_SCHEME: [(f64, u32); 3] = [(0.40, 5), (0.50, 5), (0.60, 3)];

/// Work-set scheme for a given week. The last row of weeks 1-3 is the
/// AMRAP set; the deload week has fixed reps throughout.
fn work_scheme(week: Week) -> [(f64, u32); 3] {
    match week {
        Week::One => [(0.65, 5), (0.75, 5), (0.85, 5)],
        Week::Two => [(0.70, 3), (0.80, 3), (0.90, 3)],
        Week::Three => [(0.75, 5), (0.85, 3), (0.95, 1)],
        Week::Deload => [(0.40, 5), (0.50, 5), (0.60, 5)],
    }
}

/// Rounds a raw computed weight to the nearest multiple of `increment`,
/// half away from zero. Idempotent: rounding a rounded value returns it.
pub fn round_to_increment(raw: f64, increment: f64) -> f64 {
    (raw / increment).round() * increment
}

/// Estimated maximal single-rep weight from a submaximal set:
/// `weight × (1 + 0.0333 × reps)`. At zero reps the estimate degrades to
/// the lifted weight. Monotonic non-decreasing in both arguments.
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> f64 {
    weight * (1.0 + REP_COEFFICIENT * f64::from(reps))
}

/// Conventional per-cycle training-max bump applied on week-4 wraparound:
/// upper-body lifts move half as much as lower-body lifts.
pub fn cycle_increment(lift: Lift, unit: Unit) -> f64 {
    match (lift.is_upper_body(), unit) {
        (true, Unit::Lb) => 5.0,
        (false, Unit::Lb) => 10.0,
        (true, Unit::Kg) => 2.5,
        (false, Unit::Kg) => 5.0,
    }
}

/// A full day's prescription: three warmup rows then three work rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub warmups: Vec<PrescribedSet>,
    pub work: Vec<PrescribedSet>,
}

impl Prescription {
    /// The AMRAP row, present on weeks 1-3 only.
    pub fn amrap_set(&self) -> Option<&PrescribedSet> {
        self.work.iter().find(|set| set.amrap)
    }
}

/// Maps a training max to the day's ordered warmup and work rows. Weights
/// are plate-rounded for the unit system. Pure and infallible: `Week` is a
/// closed enum, so there is no malformed input to reject.
pub fn prescribe(training_max: f64, week: Week, unit: Unit) -> Prescription {
    let increment = unit.default_increment();
    let row = |percent: f64, target_reps: u32, amrap: bool| PrescribedSet {
        percent,
        weight: round_to_increment(training_max * percent, increment),
        target_reps,
        amrap,
    };

    let warmups = WARMUP_SCHEME
        .iter()
        .map(|&(percent, reps)| row(percent, reps, false))
        .collect();

    let scheme = work_scheme(week);
    let last = scheme.len() - 1;
    let work = scheme
        .iter()
        .enumerate()
        .map(|(i, &(percent, reps))| row(percent, reps, week.has_amrap() && i == last))
        .collect();

    Prescription { warmups, work }
}
