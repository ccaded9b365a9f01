//! `claimdesk-core`: shared foundation types.
//!
//! This crate contains **pure** primitives (no IO, no UI concerns) used by the
//! auth, navigation and shell crates.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::UserId;
