use serde::{Deserialize, Serialize};

use super::athlete_profile::{AthleteId, Unit};

/// Role tags for role-based access control
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Athlete,
    Coach,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Athlete => "athlete",
            Role::Coach => "coach",
            Role::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "athlete" => Some(Role::Athlete),
            "coach" => Some(Role::Coach),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// The signed-in identity's role tags plus any team scopes, as pushed by
/// the role-subscription collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub roles: Vec<Role>,
    #[serde(default)]
    pub teams: Vec<String>,
}

impl RoleAssignment {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
            teams: Vec::new(),
        }
    }

    pub fn has(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Coach and admin may operate on other athletes' data scopes.
    pub fn can_coach(&self) -> bool {
        self.has(Role::Coach) || self.has(Role::Admin)
    }
}

/// Roster entry a coach picks an active athlete from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub athlete_id: AthleteId,
    pub first_name: String,
    pub last_name: String,
    pub team: Option<String>,
    pub unit: Unit,
}

/// The athlete a coach is currently operating "as". Session-local, never
/// shared across identities. `version` increments on every mutation and is
/// the cache-invalidation signal for dependent data-fetchers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveAthleteSelection {
    pub athlete_id: AthleteId,
    pub first_name: String,
    pub last_name: String,
    pub team: Option<String>,
    pub unit: Unit,
    pub version: u64,
}

impl ActiveAthleteSelection {
    pub fn from_entry(entry: RosterEntry, version: u64) -> Self {
        Self {
            athlete_id: entry.athlete_id,
            first_name: entry.first_name,
            last_name: entry.last_name,
            team: entry.team,
            unit: entry.unit,
            version,
        }
    }
}
