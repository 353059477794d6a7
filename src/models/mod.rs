// Data models

pub mod athlete_profile;
pub mod attendance;
pub mod cycle_plan;
pub mod roles;
pub mod workout_session;

pub use athlete_profile::*;
pub use attendance::*;
pub use cycle_plan::*;
pub use roles::*;
pub use workout_session::*;
