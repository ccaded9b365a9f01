//! Sidebar and quick-link menus, filtered by the active role.

use serde::Serialize;

use claimdesk_auth::{PageId, PermissionTable, Role, UnknownRoleError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub page: PageId,
    pub label: &'static str,
    pub path: &'static str,
}

impl From<PageId> for MenuEntry {
    fn from(page: PageId) -> Self {
        Self {
            page,
            label: page.label(),
            path: page.path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuSection {
    pub title: &'static str,
    pub entries: Vec<MenuEntry>,
}

/// The full navigation menu before filtering.
///
/// The claim workspace is reached from a claim, never from the menu.
const SIDEBAR: &[(&str, &[PageId])] = &[
    ("Overview", &[PageId::Dashboard, PageId::Reports]),
    (
        "Claims",
        &[
            PageId::ClaimsInbox,
            PageId::NewClaim,
            PageId::Acknowledgements,
            PageId::Eras,
        ],
    ),
    ("Denials & Appeals", &[PageId::Denials, PageId::Appeals]),
    ("Patients", &[PageId::Eligibility, PageId::PatientBilling]),
    (
        "Administration",
        &[
            PageId::Payers,
            PageId::FeeSchedules,
            PageId::AuditLog,
            PageId::AdminSettings,
        ],
    ),
];

const QUICK_LINKS: &[PageId] = &[
    PageId::NewClaim,
    PageId::ClaimsInbox,
    PageId::Denials,
    PageId::Eligibility,
    PageId::Reports,
];

/// Sidebar for `role`: the static menu intersected with its permitted pages.
/// Sections left empty are omitted.
pub fn sidebar(table: &PermissionTable, role: Role) -> Result<Vec<MenuSection>, UnknownRoleError> {
    let permitted = table.permitted_pages(role)?;

    Ok(SIDEBAR
        .iter()
        .filter_map(|(title, pages)| {
            let entries: Vec<MenuEntry> = pages
                .iter()
                .filter(|p| permitted.contains(*p))
                .map(|p| MenuEntry::from(*p))
                .collect();
            (!entries.is_empty()).then_some(MenuSection { title: *title, entries })
        })
        .collect())
}

pub fn quick_links(table: &PermissionTable, role: Role) -> Result<Vec<MenuEntry>, UnknownRoleError> {
    let permitted = table.permitted_pages(role)?;
    Ok(QUICK_LINKS
        .iter()
        .filter(|p| permitted.contains(*p))
        .map(|p| MenuEntry::from(*p))
        .collect())
}
