//! Top-level shell: turns session state into the view to render.

use std::sync::mpsc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use claimdesk_auth::{
    PageId, PermissionTable, RestoreOutcome, Role, SessionChange, SessionError, SessionStorage,
    SessionStore, SessionToken, UnknownRoleError, User,
};
use claimdesk_navigation::{
    page_for_legacy_name, parse_path, quick_links, resolve, sidebar, MenuEntry, MenuSection,
    NavigationRequest, RenderTarget, Resolution, UnknownPage,
};

use crate::clock::Clock;
use crate::keyboard::{Key, KeyCommand, KeyContext, KeyEvent, KeyboardDispatcher};
use crate::search::{search, SearchHit};

/// What the shell shows, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellView {
    SignedOut,
    /// Multi-role user without an active role: nothing else is shown.
    RoleChooser { roles: Vec<Role> },
    /// Blocking terms/privacy modal.
    LegalAcceptance { terms_pending: bool, privacy_pending: bool },
    Page(RenderTarget),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overlays {
    pub search_open: bool,
    pub chat_open: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShellError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    UnknownRole(#[from] UnknownRoleError),

    #[error(transparent)]
    UnknownPage(#[from] UnknownPage),

    #[error("navigation is blocked until {0}")]
    Blocked(&'static str),
}

pub struct Shell<S, C> {
    table: PermissionTable,
    session: SessionStore<S>,
    changes: mpsc::Receiver<SessionChange>,
    keyboard: KeyboardDispatcher<C>,
    current: Option<RenderTarget>,
    sidebar_open: bool,
    overlays: Overlays,
    notice: Option<String>,
}

impl<S: SessionStorage, C: Clock> Shell<S, C> {
    /// Mount the shell over an existing session (which may already be signed in).
    pub fn new(
        table: PermissionTable,
        mut session: SessionStore<S>,
        keyboard: KeyboardDispatcher<C>,
    ) -> Result<Self, ShellError> {
        let changes = session.subscribe();
        let mut shell = Self {
            table,
            session,
            changes,
            keyboard,
            current: None,
            sidebar_open: true,
            overlays: Overlays::default(),
            notice: None,
        };
        shell.land()?;
        Ok(shell)
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn table(&self) -> &PermissionTable {
        &self.table
    }

    pub fn view(&self) -> ShellView {
        let Some(user) = self.session.user() else {
            return ShellView::SignedOut;
        };
        if self.session.needs_role_choice() {
            return ShellView::RoleChooser {
                roles: user.roles().to_vec(),
            };
        }
        if self.session.needs_legal_acceptance() {
            return ShellView::LegalAcceptance {
                terms_pending: !user.terms_accepted(),
                privacy_pending: !user.privacy_accepted(),
            };
        }
        match &self.current {
            Some(target) => ShellView::Page(target.clone()),
            None => ShellView::SignedOut,
        }
    }

    pub fn current(&self) -> Option<&RenderTarget> {
        self.current.as_ref()
    }

    pub fn current_path(&self) -> Option<String> {
        self.current.as_ref().map(RenderTarget::path)
    }

    /// Message left by the last redirect, if any.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Sign a user in. Every role of the user must be in the permission
    /// table; otherwise nothing is committed.
    pub fn login(&mut self, user: User, token: Option<SessionToken>) -> Result<ShellView, ShellError> {
        self.check_roles(&user)?;
        self.session.login(user, token);
        self.sync()?;
        Ok(self.view())
    }

    /// Resume after a reload with a freshly fetched profile and the token it
    /// was fetched with.
    pub fn resume(
        &mut self,
        user: User,
        token: Option<SessionToken>,
        now: DateTime<Utc>,
    ) -> Result<RestoreOutcome, ShellError> {
        self.check_roles(&user)?;
        let outcome = self.session.restore(user, token, now);
        self.sync()?;
        Ok(outcome)
    }

    pub fn logout(&mut self) -> Result<(), ShellError> {
        self.session.logout();
        self.sync()
    }

    /// Pick the active role (from the chooser or the header role switcher).
    pub fn choose_role(&mut self, role: Role) -> Result<ShellView, ShellError> {
        self.session.change_role(role)?;
        self.sync()?;
        Ok(self.view())
    }

    pub fn accept_legal(&mut self, terms: bool, privacy: bool) -> Result<ShellView, ShellError> {
        self.session.accept_legal(terms, privacy)?;
        self.sync()?;
        Ok(self.view())
    }

    /// Navigate within the active role's permissions.
    ///
    /// A denied page, or a claim workspace without a claim, redirects to the
    /// role's default page and leaves a notice.
    pub fn navigate(&mut self, request: NavigationRequest) -> Result<Resolution, ShellError> {
        let role = self.navigable_role()?;
        let resolution = resolve(&self.table, &request, role)?;

        match &resolution {
            Resolution::Render(target) => {
                self.current = Some(target.clone());
            }
            Resolution::AccessDenied { requested, redirect_to } => {
                self.notice = Some(format!(
                    "You do not have access to {}; showing {} instead.",
                    requested.label(),
                    redirect_to.label()
                ));
                self.current = Some(self.render_default(role, *redirect_to));
            }
            Resolution::MissingResource { requested, redirect_to } => {
                self.notice = Some(format!(
                    "{} needs a claim to open; showing {} instead.",
                    requested.label(),
                    redirect_to.label()
                ));
                self.current = Some(self.render_default(role, *redirect_to));
            }
        }
        self.overlays.search_open = false;
        Ok(resolution)
    }

    /// Navigate to a URL path; unknown paths land on the dashboard.
    pub fn navigate_path(&mut self, path: &str) -> Result<Resolution, ShellError> {
        self.navigate(parse_path(path).into_request())
    }

    /// Navigate by a legacy display name; unknown names are an error.
    pub fn navigate_legacy(&mut self, name: &str) -> Result<Resolution, ShellError> {
        let page = page_for_legacy_name(name)?;
        self.navigate(NavigationRequest::page(page))
    }

    /// Feed a key press from the document.
    ///
    /// While a gate (role chooser, legal modal) is up only Escape gets
    /// through, and only to close search.
    pub fn handle_key(&mut self, event: KeyEvent, text_input_focused: bool) -> Option<KeyCommand> {
        if self.navigable_role().is_err() && event.key != Key::Escape {
            return None;
        }

        let ctx = KeyContext {
            text_input_focused,
            search_open: self.overlays.search_open,
        };
        let command = self.keyboard.handle(event, ctx)?;

        match command {
            KeyCommand::OpenSearch => self.overlays.search_open = true,
            KeyCommand::CloseSearch => self.overlays.search_open = false,
            KeyCommand::Navigate(page) => {
                if let Err(err) = self.navigate(NavigationRequest::page(page)) {
                    tracing::warn!(error = %err, %page, "shortcut navigation failed");
                }
            }
        }
        Some(command)
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_open
    }

    pub fn overlays(&self) -> Overlays {
        self.overlays
    }

    pub fn toggle_chat(&mut self) -> bool {
        self.overlays.chat_open = !self.overlays.chat_open;
        self.overlays.chat_open
    }

    /// Sidebar for the active role (empty while no page is navigable).
    pub fn sidebar(&self) -> Result<Vec<MenuSection>, UnknownRoleError> {
        match self.navigable_role() {
            Ok(role) => sidebar(&self.table, role),
            Err(_) => Ok(Vec::new()),
        }
    }

    pub fn quick_links(&self) -> Result<Vec<MenuEntry>, UnknownRoleError> {
        match self.navigable_role() {
            Ok(role) => quick_links(&self.table, role),
            Err(_) => Ok(Vec::new()),
        }
    }

    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>, ShellError> {
        let role = self.navigable_role()?;
        Ok(search(&self.table, role, query)?)
    }

    /// The active role, if nothing (chooser, legal modal) blocks navigation.
    fn navigable_role(&self) -> Result<Role, ShellError> {
        if !self.session.is_authenticated() {
            return Err(ShellError::Blocked("a user signs in"));
        }
        let Some(role) = self.session.active_role() else {
            return Err(ShellError::Blocked("a role is chosen"));
        };
        if self.session.needs_legal_acceptance() {
            return Err(ShellError::Blocked("terms and privacy are accepted"));
        }
        Ok(role)
    }

    fn check_roles(&self, user: &User) -> Result<(), ShellError> {
        for role in user.roles() {
            if let Err(err) = self.table.default_page(*role) {
                tracing::warn!(user_id = %user.id(), %role, "sign-in rejected: role missing from permission table");
                return Err(err.into());
            }
        }
        Ok(())
    }

    fn render_default(&self, role: Role, page: PageId) -> RenderTarget {
        RenderTarget {
            page,
            role,
            resource_id: None,
            section: None,
        }
    }

    /// React to session changes published since the last call.
    fn sync(&mut self) -> Result<(), ShellError> {
        let changes: Vec<SessionChange> = self.changes.try_iter().collect();
        for change in changes {
            tracing::debug!(?change, "shell observed session change");
            match change {
                SessionChange::SignedOut | SessionChange::SignedIn { .. } => {
                    self.current = None;
                    self.overlays = Overlays::default();
                    self.notice = None;
                }
                SessionChange::RoleChanged { .. } | SessionChange::LegalAccepted { .. } => {}
            }
        }
        self.land()
    }

    /// Make `current` agree with the active role: keep a still-permitted page,
    /// otherwise land on the role's default page.
    fn land(&mut self) -> Result<(), ShellError> {
        let Some(role) = self.session.active_role() else {
            self.current = None;
            return Ok(());
        };

        let target = match self.current.take() {
            Some(current) if self.table.has_access(role, current.page)? => RenderTarget { role, ..current },
            _ => self.render_default(role, self.table.default_page(role)?),
        };
        self.current = Some(target);
        Ok(())
    }
}

/// Heading for a rendered page; dashboards are titled per role.
pub fn page_title(target: &RenderTarget) -> String {
    match target.page {
        PageId::Dashboard => format!("{} Dashboard", target.role.label()),
        page => page.label().to_string(),
    }
}
