//! Signed-in user profile.

use serde::{Deserialize, Serialize};

use claimdesk_core::{DomainError, DomainResult, UserId};

use crate::Role;

/// Wire shape of a user profile (as returned by `/auth/me`).
///
/// Converted into [`User`] through validation; never used directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub display_name: String,
    pub email: String,
    pub roles: Vec<Role>,
    #[serde(default)]
    pub active_role: Option<Role>,
    #[serde(default)]
    pub terms_accepted: bool,
    #[serde(default)]
    pub privacy_accepted: bool,
}

/// Authenticated user.
///
/// # Invariants
/// - `roles` is non-empty and free of duplicates (first occurrence wins).
/// - `active_role`, when set, is one of `roles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserRecord", into = "UserRecord")]
pub struct User {
    id: UserId,
    display_name: String,
    email: String,
    roles: Vec<Role>,
    active_role: Option<Role>,
    terms_accepted: bool,
    privacy_accepted: bool,
}

impl User {
    pub fn new(
        id: UserId,
        display_name: impl Into<String>,
        email: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
    ) -> DomainResult<Self> {
        let email = email.into();
        if !email.contains('@') {
            return Err(DomainError::validation("email must contain '@'"));
        }

        let mut deduped: Vec<Role> = Vec::new();
        for role in roles {
            if !deduped.contains(&role) {
                deduped.push(role);
            }
        }
        if deduped.is_empty() {
            return Err(DomainError::invariant("user must have at least one role"));
        }

        Ok(Self {
            id,
            display_name: display_name.into(),
            email,
            roles: deduped,
            active_role: None,
            terms_accepted: false,
            privacy_accepted: false,
        })
    }

    /// Pre-select an active role; rejected if it is not assigned.
    pub fn with_active_role(mut self, role: Role) -> DomainResult<Self> {
        if !self.has_role(role) {
            return Err(DomainError::invariant(format!(
                "active role '{role}' is not assigned to the user"
            )));
        }
        self.active_role = Some(role);
        Ok(self)
    }

    pub fn with_legal_accepted(mut self, terms: bool, privacy: bool) -> Self {
        self.terms_accepted = terms;
        self.privacy_accepted = privacy;
        self
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn active_role(&self) -> Option<Role> {
        self.active_role
    }

    pub fn is_multi_role(&self) -> bool {
        self.roles.len() > 1
    }

    pub fn terms_accepted(&self) -> bool {
        self.terms_accepted
    }

    pub fn privacy_accepted(&self) -> bool {
        self.privacy_accepted
    }

    pub fn legal_accepted(&self) -> bool {
        self.terms_accepted && self.privacy_accepted
    }

    /// Only the session store changes the active role after construction.
    pub(crate) fn set_active_role(&mut self, role: Option<Role>) {
        debug_assert!(role.is_none_or(|r| self.has_role(r)));
        self.active_role = role;
    }

    pub(crate) fn set_legal_accepted(&mut self, terms: bool, privacy: bool) {
        self.terms_accepted |= terms;
        self.privacy_accepted |= privacy;
    }
}

impl TryFrom<UserRecord> for User {
    type Error = DomainError;

    fn try_from(value: UserRecord) -> Result<Self, Self::Error> {
        let user = User::new(value.id, value.display_name, value.email, value.roles)?
            .with_legal_accepted(value.terms_accepted, value.privacy_accepted);

        match value.active_role {
            Some(role) => user.with_active_role(role),
            None => Ok(user),
        }
    }
}

impl From<User> for UserRecord {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            display_name: value.display_name,
            email: value.email,
            roles: value.roles,
            active_role: value.active_role,
            terms_accepted: value.terms_accepted,
            privacy_accepted: value.privacy_accepted,
        }
    }
}
