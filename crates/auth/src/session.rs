//! Session/auth store: the single owner of the signed-in user and active role.

use std::sync::mpsc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use claimdesk_core::UserId;

use crate::storage::{PersistedSession, SessionStorage};
use crate::token::validate_token;
use crate::{Role, SessionToken, User};

/// A state transition published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    SignedIn {
        user_id: UserId,
        active_role: Option<Role>,
    },
    RoleChanged {
        from: Option<Role>,
        to: Role,
    },
    LegalAccepted {
        terms: bool,
        privacy: bool,
    },
    SignedOut,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("no user is signed in")]
    NotAuthenticated,

    #[error("role '{0}' is not assigned to the signed-in user")]
    RoleNotAssigned(Role),
}

/// Outcome of resuming a persisted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Nothing was persisted; the user is signed in fresh.
    Fresh,
    /// The persisted active role was re-applied.
    Resumed { active_role: Option<Role> },
    /// Persisted state belonged to another user or was no longer valid; it
    /// was discarded and the user is signed out.
    Discarded(String),
}

/// Injectable session store.
///
/// All writes go through `login`, `logout`, `change_role` and `accept_legal`;
/// `change_role` is the only path that changes the active role once signed in.
/// Calls are applied in order, so two successive role changes leave the last
/// one in effect.
///
/// Persistence failures are logged and never undo an in-memory transition.
pub struct SessionStore<S> {
    storage: S,
    user: Option<User>,
    token: Option<SessionToken>,
    revision: u64,
    subscribers: Vec<mpsc::Sender<SessionChange>>,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            user: None,
            token: None,
            revision: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn active_role(&self) -> Option<Role> {
        self.user.as_ref().and_then(User::active_role)
    }

    /// Multi-role user without an active role yet.
    pub fn needs_role_choice(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.active_role().is_none())
    }

    pub fn needs_legal_acceptance(&self) -> bool {
        self.user.as_ref().is_some_and(|u| !u.legal_accepted())
    }

    /// Incremented on every published change; views compare it to decide
    /// whether to re-derive permitted pages.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Receive every subsequent [`SessionChange`].
    pub fn subscribe(&mut self) -> mpsc::Receiver<SessionChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Sign a user in. A single-role user gets that role selected automatically.
    pub fn login(&mut self, mut user: User, token: Option<SessionToken>) -> SessionChange {
        if user.active_role().is_none() && !user.is_multi_role() {
            let only = user.roles()[0];
            user.set_active_role(Some(only));
        }

        tracing::info!(
            user_id = %user.id(),
            roles = ?user.roles(),
            active_role = ?user.active_role(),
            "user signed in"
        );

        let change = SessionChange::SignedIn {
            user_id: user.id(),
            active_role: user.active_role(),
        };
        self.user = Some(user);
        self.token = token;
        self.persist();
        self.publish(change.clone());
        change
    }

    /// Re-apply persisted state to a freshly fetched profile after a reload.
    ///
    /// `token` is the credential the profile was fetched with. It takes
    /// precedence over the persisted token and is kept on a fresh sign-in.
    pub fn restore(&mut self, user: User, token: Option<SessionToken>, now: DateTime<Utc>) -> RestoreOutcome {
        let persisted = match self.storage.load() {
            Ok(p) => p,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load persisted session");
                None
            }
        };

        let Some(persisted) = persisted else {
            self.login(user, token);
            return RestoreOutcome::Fresh;
        };

        if persisted.user_id != user.id() {
            return self.discard(format!(
                "persisted session belongs to user {}",
                persisted.user_id
            ));
        }

        let token = token.or(persisted.token);
        if let Some(token) = &token {
            if let Err(err) = validate_token(token, now) {
                return self.discard(err.to_string());
            }
        }

        let mut user = user;
        match persisted.active_role {
            Some(role) if user.has_role(role) => user.set_active_role(Some(role)),
            Some(role) => {
                tracing::warn!(%role, "persisted active role no longer assigned; ignoring it");
            }
            None => {}
        }

        self.login(user, token);
        RestoreOutcome::Resumed {
            active_role: self.active_role(),
        }
    }

    fn discard(&mut self, reason: String) -> RestoreOutcome {
        tracing::warn!(%reason, "discarding persisted session");
        if let Err(err) = self.storage.clear() {
            tracing::warn!(error = %err, "failed to clear persisted session");
        }
        self.user = None;
        self.token = None;
        RestoreOutcome::Discarded(reason)
    }

    pub fn logout(&mut self) -> Option<SessionChange> {
        let user = self.user.take()?;
        self.token = None;

        tracing::info!(user_id = %user.id(), "user signed out");

        if let Err(err) = self.storage.clear() {
            tracing::warn!(error = %err, "failed to clear persisted session");
        }
        self.publish(SessionChange::SignedOut);
        Some(SessionChange::SignedOut)
    }

    /// Switch the active role.
    pub fn change_role(&mut self, role: Role) -> Result<SessionChange, SessionError> {
        let user = self.user.as_mut().ok_or(SessionError::NotAuthenticated)?;
        if !user.has_role(role) {
            tracing::warn!(user_id = %user.id(), %role, "role change rejected");
            return Err(SessionError::RoleNotAssigned(role));
        }

        let from = user.active_role();
        user.set_active_role(Some(role));
        tracing::info!(user_id = %user.id(), ?from, to = %role, "active role changed");

        let change = SessionChange::RoleChanged { from, to: role };
        self.persist();
        self.publish(change.clone());
        Ok(change)
    }

    /// Record terms/privacy acceptance. Flags only ever move from false to true.
    pub fn accept_legal(&mut self, terms: bool, privacy: bool) -> Result<SessionChange, SessionError> {
        let user = self.user.as_mut().ok_or(SessionError::NotAuthenticated)?;
        user.set_legal_accepted(terms, privacy);

        let change = SessionChange::LegalAccepted {
            terms: user.terms_accepted(),
            privacy: user.privacy_accepted(),
        };
        self.publish(change.clone());
        Ok(change)
    }

    fn persist(&self) {
        let Some(user) = &self.user else {
            return;
        };
        let session = PersistedSession {
            user_id: user.id(),
            active_role: user.active_role(),
            token: self.token.clone(),
        };
        if let Err(err) = self.storage.save(&session) {
            tracing::warn!(error = %err, "failed to persist session");
        }
    }

    fn publish(&mut self, change: SessionChange) {
        self.revision += 1;
        // Drop any dead subscribers while publishing.
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
    }
}
