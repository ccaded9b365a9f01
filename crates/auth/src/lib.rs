//! `claimdesk-auth`: roles, page permissions and the session store.
//!
//! This crate is intentionally decoupled from HTTP and rendering.

pub mod activation;
pub mod pages;
pub mod permissions;
pub mod roles;
pub mod session;
pub mod storage;
pub mod token;
pub mod user;

pub use activation::{validate_activation, PasswordRule};
pub use pages::PageId;
pub use permissions::{PageDescriptor, PermissionTable, PermissionTableError, RolePages};
pub use roles::{Role, UnknownRoleError};
pub use session::{RestoreOutcome, SessionChange, SessionError, SessionStore};
pub use storage::{FileStorage, MemoryStorage, PersistedSession, SessionStorage, StorageError};
pub use token::{validate_token, SessionToken, TokenValidationError};
pub use user::{User, UserRecord};
