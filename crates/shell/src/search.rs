//! Search dialog: pages the active role may open, plus claim-id jumps.

use claimdesk_auth::{PageId, PermissionTable, Role, UnknownRoleError};
use claimdesk_navigation::{MenuEntry, NavigationRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchHit {
    Page(MenuEntry),
    /// The query looks like a claim number; open it in the claim workspace.
    Claim(NavigationRequest),
}

const CLAIM_PREFIX: &str = "CLM-";

/// Case-insensitive substring match over page labels, restricted to pages
/// `role` may open. Pages that need a record id are only reachable through a
/// claim-number query.
pub fn search(table: &PermissionTable, role: Role, query: &str) -> Result<Vec<SearchHit>, UnknownRoleError> {
    let permitted = table.permitted_pages(role)?;
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(Vec::new());
    }

    let mut hits = Vec::new();

    if permitted.contains(&PageId::ClaimWorkspace) {
        let trimmed = query.trim();
        let looks_like_claim = trimmed.len() > CLAIM_PREFIX.len()
            && trimmed
                .get(..CLAIM_PREFIX.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(CLAIM_PREFIX));
        if looks_like_claim {
            hits.push(SearchHit::Claim(
                NavigationRequest::page(PageId::ClaimWorkspace).with_resource(trimmed.to_uppercase()),
            ));
        }
    }

    hits.extend(
        permitted
            .iter()
            .filter(|p| !p.takes_resource_id())
            .filter(|p| p.label().to_lowercase().contains(&needle))
            .map(|p| SearchHit::Page(MenuEntry::from(*p))),
    );

    Ok(hits)
}
