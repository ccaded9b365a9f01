//! URL path ⇄ navigation request translation.

use claimdesk_auth::PageId;

use crate::NavigationRequest;

/// Where unknown paths land.
pub const FALLBACK_PATH: &str = "/dashboard";

/// A parsed URL path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Page(NavigationRequest),
    /// No page matches; the shell redirects to [`FALLBACK_PATH`].
    Unknown(String),
}

impl Route {
    /// The request the shell should act on (unknown paths become the dashboard).
    pub fn into_request(self) -> NavigationRequest {
        match self {
            Route::Page(request) => request,
            Route::Unknown(_) => NavigationRequest::page(PageId::Dashboard),
        }
    }
}

/// Parse a URL path such as `/claim-workspace/CLM-1#notes?tab=2`.
///
/// Query strings are ignored; a `#fragment` becomes the section anchor. A
/// trailing slash is tolerated and `/` is the dashboard.
pub fn parse_path(path: &str) -> Route {
    let without_query = match path.split_once('?') {
        Some((head, tail)) => {
            // Keep a fragment that was written after the query string.
            match tail.split_once('#') {
                Some((_, fragment)) => format!("{head}#{fragment}"),
                None => head.to_string(),
            }
        }
        None => path.to_string(),
    };

    let (route_part, section) = match without_query.split_once('#') {
        Some((route, fragment)) => (route.to_string(), decode_component(fragment)),
        None => (without_query, None),
    };

    let segments: Vec<&str> = route_part
        .trim()
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    let matched = match segments.as_slice() {
        [] => Some(NavigationRequest::page(PageId::Dashboard)),
        [base, id] => page_for_segment(base)
            .filter(PageId::takes_resource_id)
            .zip(decode_component(id))
            .map(|(page, id)| NavigationRequest::page(page).with_resource(id)),
        [base] => page_for_segment(base)
            .filter(|page| !page.takes_resource_id())
            .map(NavigationRequest::page),
        _ => None,
    };

    match matched {
        Some(mut request) => {
            request.section = section;
            Route::Page(request)
        }
        None => {
            tracing::debug!(%path, "no route matches path");
            Route::Unknown(path.to_string())
        }
    }
}

/// Percent-decode a path segment or fragment; empty or malformed input is `None`.
fn decode_component(raw: &str) -> Option<String> {
    urlencoding::decode(raw)
        .ok()
        .map(|decoded| decoded.into_owned())
        .filter(|decoded| !decoded.is_empty())
}

fn page_for_segment(segment: &str) -> Option<PageId> {
    PageId::ALL
        .into_iter()
        .find(|page| page.path().trim_start_matches('/') == segment)
}

/// Canonical path for a request.
///
/// The record id and section are percent-encoded, so any id survives a trip
/// through [`parse_path`].
pub fn path_for(request: &NavigationRequest) -> String {
    let mut path = request.page.path().to_string();
    if request.page.takes_resource_id() {
        if let Some(id) = &request.resource_id {
            path.push('/');
            path.push_str(&urlencoding::encode(id));
        }
    }
    if let Some(section) = &request.section {
        path.push('#');
        path.push_str(&urlencoding::encode(section));
    }
    path
}
