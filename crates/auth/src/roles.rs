use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role identifier used for page-level RBAC.
///
/// Roles are defined by the system, not by user data, so the set is closed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Coder,
    Billing,
    Manager,
    Executive,
    Auditor,
    Admin,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Coder,
        Role::Billing,
        Role::Manager,
        Role::Executive,
        Role::Auditor,
        Role::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Coder => "coder",
            Role::Billing => "billing",
            Role::Manager => "manager",
            Role::Executive => "executive",
            Role::Auditor => "auditor",
            Role::Admin => "admin",
        }
    }

    /// Label shown in the role chooser.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Coder => "Coder",
            Role::Billing => "Billing Specialist",
            Role::Manager => "Revenue Cycle Manager",
            Role::Executive => "Executive",
            Role::Auditor => "Auditor",
            Role::Admin => "Administrator",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role name or table lookup that the system does not know about.
///
/// Surfaced as an error rather than folded into allow/deny so that a missing
/// table entry can never silently grant or revoke access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRoleError(pub String);

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownRoleError(s.to_string()))
    }
}
