//! `claimdesk-navigation`: decides which page renders for the active role.
//!
//! Pure lookups over the permission table: no IO, no session mutation.

pub mod legacy;
pub mod menu;
pub mod request;
pub mod resolver;
pub mod routes;

pub use legacy::{legacy_name, page_for_legacy_name, page_for_legacy_name_or_default, UnknownPage};
pub use menu::{quick_links, sidebar, MenuEntry, MenuSection};
pub use request::{NavigationRequest, RenderTarget, Resolution};
pub use resolver::resolve;
pub use routes::{parse_path, path_for, Route, FALLBACK_PATH};
