//! `claimdesk-shell`
//!
//! **Responsibility:** the application shell around the navigation core.
//!
//! This crate provides:
//! - The shell/router state (role chooser, legal modal, routed page, overlays)
//! - The keyboard command dispatcher and its clock
//! - Explicit per-view load state and a typed backend client
//! - Environment configuration

pub mod api;
pub mod clock;
pub mod config;
pub mod keyboard;
pub mod load;
pub mod search;
pub mod shell;

pub use api::{ApiClient, ApiError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, ShellConfig};
pub use keyboard::{ChordState, Key, KeyCommand, KeyContext, KeyEvent, KeyboardDispatcher, Modifiers};
pub use load::LoadState;
pub use search::SearchHit;
pub use shell::{page_title, Overlays, Shell, ShellError, ShellView};
