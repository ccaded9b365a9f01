use serde::{Deserialize, Serialize};

use claimdesk_auth::{PageId, Role};

/// A single navigation action: which page, optionally which record, and which
/// section of it to expand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRequest {
    pub page: PageId,
    pub resource_id: Option<String>,
    pub section: Option<String>,
}

impl NavigationRequest {
    pub fn page(page: PageId) -> Self {
        Self {
            page,
            resource_id: None,
            section: None,
        }
    }

    pub fn with_resource(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }
}

impl From<PageId> for NavigationRequest {
    fn from(page: PageId) -> Self {
        Self::page(page)
    }
}

/// What the shell should mount.
///
/// `role` is carried along so role-specific variants of a page (most notably
/// the dashboard) can be chosen without consulting the session again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderTarget {
    pub page: PageId,
    pub role: Role,
    pub resource_id: Option<String>,
    pub section: Option<String>,
}

impl RenderTarget {
    /// Canonical path of the rendered page, including sub-resource and anchor.
    pub fn path(&self) -> String {
        crate::routes::path_for(&NavigationRequest {
            page: self.page,
            resource_id: self.resource_id.clone(),
            section: self.section.clone(),
        })
    }
}

/// Result of resolving a request against the active role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    Render(RenderTarget),
    AccessDenied { requested: PageId, redirect_to: PageId },
    /// The page is permitted but addressed by a record id the request lacks.
    MissingResource { requested: PageId, redirect_to: PageId },
}

impl Resolution {
    pub fn is_denied(&self) -> bool {
        matches!(self, Resolution::AccessDenied { .. })
    }

    /// Where the shell lands instead, for any non-rendering outcome.
    pub fn redirect_to(&self) -> Option<PageId> {
        match self {
            Resolution::Render(_) => None,
            Resolution::AccessDenied { redirect_to, .. } | Resolution::MissingResource { redirect_to, .. } => {
                Some(*redirect_to)
            }
        }
    }
}
