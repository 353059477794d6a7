// Business logic services

pub mod attendance_service;
pub mod plan_service;
pub mod prescription;
pub mod profile_service;
pub mod role_resolver;
pub mod session_ledger_service;

pub use attendance_service::AttendanceService;
pub use plan_service::PlanService;
pub use profile_service::ProfileService;
pub use role_resolver::{
    LocalStore, MemoryLocalStore, RoleFeed, RoleResolver, WatchRoleFeed,
};
pub use session_ledger_service::{AppendOutcome, SessionLedgerService};
