//! Periodization and session-tracking core for a 5/3/1-style team
//! strength-training tracker: load prescription, workout recording with
//! PR detection, team attendance sheets, and role-scoped active-athlete
//! selection. Persistence and role pushes arrive through collaborator
//! traits; this crate owns no I/O of its own.

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod store;

pub use config::CoreConfig;
pub use errors::CoreError;
