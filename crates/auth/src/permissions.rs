//! Static role → page permission table.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{PageId, Role, UnknownRoleError};

/// Pages a single role may open, plus its landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePages {
    pub permitted: BTreeSet<PageId>,
    pub default: PageId,
}

impl RolePages {
    pub fn new(permitted: impl IntoIterator<Item = PageId>, default: PageId) -> Self {
        Self {
            permitted: permitted.into_iter().collect(),
            default,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PermissionTableError {
    #[error("role '{0}' has no permitted pages")]
    EmptyPermittedSet(Role),

    #[error("default page '{page}' of role '{role}' is not in its permitted set")]
    DefaultNotPermitted { role: Role, page: PageId },

    #[error("malformed permission table: {0}")]
    Malformed(String),
}

/// A page together with the roles allowed to view it (for display/audit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDescriptor {
    pub id: PageId,
    pub label: &'static str,
    pub roles: BTreeSet<Role>,
}

/// Mapping from role to permitted pages and default page.
///
/// Invariant: every entry has a non-empty permitted set containing its
/// default page. Checked on every construction path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Role, RolePages>", into = "BTreeMap<Role, RolePages>")]
pub struct PermissionTable {
    entries: BTreeMap<Role, RolePages>,
}

impl PermissionTable {
    /// Build a table from explicit entries, validating the invariant.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (Role, RolePages)>,
    ) -> Result<Self, PermissionTableError> {
        let entries: BTreeMap<Role, RolePages> = entries.into_iter().collect();

        for (role, pages) in &entries {
            if pages.permitted.is_empty() {
                return Err(PermissionTableError::EmptyPermittedSet(*role));
            }
            if !pages.permitted.contains(&pages.default) {
                return Err(PermissionTableError::DefaultNotPermitted {
                    role: *role,
                    page: pages.default,
                });
            }
        }

        Ok(Self { entries })
    }

    /// Parse a table from JSON (`{"coder": {"permitted": [...], "default": "..."}}`).
    pub fn from_json(json: &str) -> Result<Self, PermissionTableError> {
        serde_json::from_str(json).map_err(|e| PermissionTableError::Malformed(e.to_string()))
    }

    /// The table shipped with the application.
    pub fn standard() -> Self {
        use PageId::*;

        let entries = [
            (
                Role::Coder,
                RolePages::new(
                    [Dashboard, ClaimsInbox, ClaimWorkspace, NewClaim, Denials, Eligibility],
                    Dashboard,
                ),
            ),
            (
                Role::Billing,
                RolePages::new(
                    [
                        Dashboard,
                        ClaimsInbox,
                        ClaimWorkspace,
                        NewClaim,
                        Acknowledgements,
                        Eras,
                        Denials,
                        Appeals,
                        Eligibility,
                        PatientBilling,
                    ],
                    Dashboard,
                ),
            ),
            (
                Role::Manager,
                RolePages::new(
                    [
                        Dashboard,
                        ClaimsInbox,
                        ClaimWorkspace,
                        Acknowledgements,
                        Eras,
                        Denials,
                        Appeals,
                        PatientBilling,
                        Payers,
                        FeeSchedules,
                        Reports,
                    ],
                    Dashboard,
                ),
            ),
            (Role::Executive, RolePages::new([Dashboard, Reports], Dashboard)),
            (
                Role::Auditor,
                RolePages::new(
                    [Dashboard, ClaimsInbox, ClaimWorkspace, Denials, Appeals, Reports, AuditLog],
                    Dashboard,
                ),
            ),
            (Role::Admin, RolePages::new(PageId::ALL, Dashboard)),
        ];

        Self {
            entries: entries.into_iter().collect(),
        }
    }

    fn entry(&self, role: Role) -> Result<&RolePages, UnknownRoleError> {
        self.entries
            .get(&role)
            .ok_or_else(|| UnknownRoleError(role.as_str().to_string()))
    }

    pub fn permitted_pages(&self, role: Role) -> Result<&BTreeSet<PageId>, UnknownRoleError> {
        Ok(&self.entry(role)?.permitted)
    }

    pub fn default_page(&self, role: Role) -> Result<PageId, UnknownRoleError> {
        Ok(self.entry(role)?.default)
    }

    pub fn has_access(&self, role: Role, page: PageId) -> Result<bool, UnknownRoleError> {
        Ok(self.entry(role)?.permitted.contains(&page))
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.entries.keys().copied()
    }

    /// Every page with the roles that may view it, in `PageId` order.
    pub fn page_descriptors(&self) -> Vec<PageDescriptor> {
        PageId::ALL
            .into_iter()
            .map(|id| PageDescriptor {
                id,
                label: id.label(),
                roles: self
                    .entries
                    .iter()
                    .filter(|(_, pages)| pages.permitted.contains(&id))
                    .map(|(role, _)| *role)
                    .collect(),
            })
            .collect()
    }
}

impl Default for PermissionTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<BTreeMap<Role, RolePages>> for PermissionTable {
    type Error = PermissionTableError;

    fn try_from(value: BTreeMap<Role, RolePages>) -> Result<Self, Self::Error> {
        Self::from_entries(value)
    }
}

impl From<PermissionTable> for BTreeMap<Role, RolePages> {
    fn from(value: PermissionTable) -> Self {
        value.entries
    }
}
