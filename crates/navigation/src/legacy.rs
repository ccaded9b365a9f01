//! Translation of legacy human-readable page names ("Claims Inbox") to pages.
//!
//! Older screens and saved links refer to pages by display name. The table is
//! closed: a name that is not listed yields [`UnknownPage`].

use thiserror::Error;

use claimdesk_auth::PageId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown page name '{0}'")]
pub struct UnknownPage(pub String);

/// Names used by older screens that differ from the current labels.
const ALIASES: &[(&str, PageId)] = &[
    ("Home", PageId::Dashboard),
    ("Inbox", PageId::ClaimsInbox),
    ("Claim Details", PageId::ClaimWorkspace),
    ("Create Claim", PageId::NewClaim),
    ("Acks", PageId::Acknowledgements),
    ("Remittances", PageId::Eras),
    ("Denial Management", PageId::Denials),
    ("Eligibility Checks", PageId::Eligibility),
    ("Payer Management", PageId::Payers),
    ("Analytics", PageId::Reports),
    ("Settings", PageId::AdminSettings),
];

/// Resolve a legacy display name.
///
/// Matching is exact (after trimming) against current labels and aliases,
/// then case-insensitive.
pub fn page_for_legacy_name(name: &str) -> Result<PageId, UnknownPage> {
    let needle = name.trim();

    let labels = PageId::ALL.into_iter().map(|p| (p.label(), p));
    let candidates = || labels.clone().chain(ALIASES.iter().copied());

    candidates()
        .find(|(label, _)| *label == needle)
        .or_else(|| candidates().find(|(label, _)| label.eq_ignore_ascii_case(needle)))
        .map(|(_, page)| page)
        .ok_or_else(|| UnknownPage(name.to_string()))
}

/// Legacy behaviour: an unrecognised name silently opened a default page.
///
/// Kept for callers that still need it; every fallback is logged so broken
/// links show up instead of being masked.
pub fn page_for_legacy_name_or_default(name: &str, default: PageId) -> PageId {
    match page_for_legacy_name(name) {
        Ok(page) => page,
        Err(err) => {
            tracing::warn!(error = %err, fallback = %default, "legacy page name fell back to default");
            default
        }
    }
}

/// The display name older screens use for `page`.
pub fn legacy_name(page: PageId) -> &'static str {
    page.label()
}
