use chrono::{Duration, Utc};

use claimdesk_auth::{
    MemoryStorage, PageId, PermissionTable, PersistedSession, RestoreOutcome, Role, RolePages, SessionError,
    SessionStorage, SessionStore, SessionToken, User,
};
use claimdesk_core::UserId;
use claimdesk_navigation::{NavigationRequest, Resolution};
use claimdesk_shell::{
    page_title, KeyCommand, KeyEvent, KeyboardDispatcher, ManualClock, Shell, ShellConfig, ShellError, ShellView,
};

fn user(roles: &[Role]) -> User {
    User::new(UserId::new(), "Riley Chen", "riley@example.com", roles.iter().copied())
        .unwrap()
        .with_legal_accepted(true, true)
}

fn shell_with(storage: MemoryStorage) -> (Shell<MemoryStorage, ManualClock>, ManualClock) {
    let clock = ManualClock::default();
    let shell = Shell::new(
        PermissionTable::standard(),
        SessionStore::new(storage),
        KeyboardDispatcher::new(clock.clone()),
    )
    .unwrap();
    (shell, clock)
}

fn coder_only_shell(storage: MemoryStorage) -> Shell<MemoryStorage, ManualClock> {
    let table = PermissionTable::from_entries([(
        Role::Coder,
        RolePages::new([PageId::Dashboard, PageId::ClaimsInbox], PageId::Dashboard),
    )])
    .unwrap();
    Shell::new(
        table,
        SessionStore::new(storage),
        KeyboardDispatcher::new(ManualClock::default()),
    )
    .unwrap()
}

fn shell() -> (Shell<MemoryStorage, ManualClock>, ManualClock) {
    shell_with(MemoryStorage::new())
}

fn page(view: &ShellView) -> (PageId, Role) {
    match view {
        ShellView::Page(target) => (target.page, target.role),
        other => panic!("expected a page, got {other:?}"),
    }
}

#[test]
fn signed_out_shell_shows_nothing_navigable() {
    let (mut shell, _clock) = shell();
    assert_eq!(shell.view(), ShellView::SignedOut);
    assert!(shell.sidebar().unwrap().is_empty());
    assert_eq!(
        shell.navigate(NavigationRequest::page(PageId::Dashboard)),
        Err(ShellError::Blocked("a user signs in"))
    );
}

#[test]
fn multi_role_login_shows_role_chooser_then_dashboard() {
    let (mut shell, _clock) = shell();

    let view = shell.login(user(&[Role::Coder, Role::Billing]), None).unwrap();
    assert_eq!(
        view,
        ShellView::RoleChooser {
            roles: vec![Role::Coder, Role::Billing]
        }
    );
    // Nothing but the chooser: no sidebar, no navigation.
    assert!(shell.sidebar().unwrap().is_empty());
    assert!(shell.navigate_path("/claims-inbox").is_err());

    let view = shell.choose_role(Role::Billing).unwrap();
    assert_eq!(page(&view), (PageId::Dashboard, Role::Billing));
    assert_eq!(shell.current_path().as_deref(), Some("/dashboard"));
    assert_eq!(shell.session().active_role(), Some(Role::Billing));

    let ShellView::Page(target) = view else { unreachable!() };
    assert_eq!(page_title(&target), "Billing Specialist Dashboard");
}

#[test]
fn single_role_login_skips_chooser() {
    let (mut shell, _clock) = shell();
    let view = shell.login(user(&[Role::Coder]), None).unwrap();
    assert_eq!(page(&view), (PageId::Dashboard, Role::Coder));
}

#[test]
fn manager_requesting_admin_settings_is_redirected() {
    let (mut shell, _clock) = shell();
    shell.login(user(&[Role::Manager]), None).unwrap();
    shell.navigate_path("/reports").unwrap();

    let resolution = shell.navigate_legacy("Admin & Settings").unwrap();
    assert_eq!(
        resolution,
        Resolution::AccessDenied {
            requested: PageId::AdminSettings,
            redirect_to: PageId::Dashboard,
        }
    );
    assert_eq!(page(&shell.view()), (PageId::Dashboard, Role::Manager));
    assert!(shell.take_notice().unwrap().contains("Admin & Settings"));
}

#[test]
fn unknown_legacy_name_is_reported_not_masked() {
    let (mut shell, _clock) = shell();
    shell.login(user(&[Role::Admin]), None).unwrap();
    shell.navigate_path("/payers").unwrap();

    let err = shell.navigate_legacy("Fax Center").unwrap_err();
    assert!(matches!(err, ShellError::UnknownPage(_)));
    // The current page is untouched.
    assert_eq!(page(&shell.view()).0, PageId::Payers);
}

#[test]
fn unknown_path_lands_on_dashboard() {
    let (mut shell, _clock) = shell();
    shell.login(user(&[Role::Auditor]), None).unwrap();
    shell.navigate_path("/audit-log").unwrap();

    shell.navigate_path("/totally/unknown").unwrap();
    assert_eq!(shell.current_path().as_deref(), Some("/dashboard"));
}

#[test]
fn deep_link_carries_claim_and_section() {
    let (mut shell, _clock) = shell();
    shell.login(user(&[Role::Billing]), None).unwrap();

    shell.navigate_path("/claim-workspace/CLM-3001#remittance").unwrap();
    let target = shell.current().unwrap();
    assert_eq!(target.page, PageId::ClaimWorkspace);
    assert_eq!(target.resource_id.as_deref(), Some("CLM-3001"));
    assert_eq!(target.section.as_deref(), Some("remittance"));
}

#[test]
fn legal_modal_blocks_navigation_until_accepted() {
    let (mut shell, _clock) = shell();
    let u = User::new(UserId::new(), "Noor", "noor@example.com", [Role::Coder]).unwrap();

    let view = shell.login(u, None).unwrap();
    assert_eq!(
        view,
        ShellView::LegalAcceptance {
            terms_pending: true,
            privacy_pending: true
        }
    );
    assert!(shell.navigate_path("/denials").is_err());
    assert_eq!(shell.handle_key(KeyEvent::char('/'), false), None);

    let view = shell.accept_legal(true, false).unwrap();
    assert_eq!(
        view,
        ShellView::LegalAcceptance {
            terms_pending: false,
            privacy_pending: true
        }
    );

    let view = shell.accept_legal(false, true).unwrap();
    assert_eq!(page(&view), (PageId::Dashboard, Role::Coder));
    assert!(shell.navigate_path("/denials").is_ok());
}

#[test]
fn legal_modal_can_be_escaped_by_logout() {
    let (mut shell, _clock) = shell();
    let u = User::new(UserId::new(), "Noor", "noor@example.com", [Role::Coder]).unwrap();
    shell.login(u, None).unwrap();

    shell.logout().unwrap();
    assert_eq!(shell.view(), ShellView::SignedOut);
}

#[test]
fn role_switch_keeps_page_when_still_permitted() {
    let (mut shell, _clock) = shell();
    shell
        .login(user(&[Role::Billing, Role::Manager, Role::Executive]), None)
        .unwrap();
    shell.choose_role(Role::Billing).unwrap();
    shell.navigate_path("/denials").unwrap();

    shell.choose_role(Role::Manager).unwrap();
    assert_eq!(page(&shell.view()), (PageId::Denials, Role::Manager));

    // Executives cannot see denials: land on their default page.
    shell.choose_role(Role::Executive).unwrap();
    assert_eq!(page(&shell.view()), (PageId::Dashboard, Role::Executive));
}

#[test]
fn role_switch_to_unassigned_role_fails() {
    let (mut shell, _clock) = shell();
    shell.login(user(&[Role::Coder]), None).unwrap();

    assert_eq!(
        shell.choose_role(Role::Admin),
        Err(ShellError::Session(SessionError::RoleNotAssigned(Role::Admin)))
    );
    assert_eq!(shell.session().active_role(), Some(Role::Coder));
}

#[test]
fn keyboard_chord_navigates_through_resolver() {
    let (mut shell, clock) = shell();
    shell.login(user(&[Role::Billing]), None).unwrap();

    assert_eq!(shell.handle_key(KeyEvent::char('g'), false), None);
    clock.advance(Duration::milliseconds(300));
    assert_eq!(
        shell.handle_key(KeyEvent::char('i'), false),
        Some(KeyCommand::Navigate(PageId::ClaimsInbox))
    );
    assert_eq!(shell.current_path().as_deref(), Some("/claims-inbox"));

    shell.handle_key(KeyEvent::char('g'), false);
    clock.advance(Duration::milliseconds(1500));
    assert_eq!(shell.handle_key(KeyEvent::char('e'), false), None);
    assert_eq!(shell.current_path().as_deref(), Some("/claims-inbox"));
}

#[test]
fn shortcut_to_forbidden_page_redirects() {
    let (mut shell, _clock) = shell();
    shell.login(user(&[Role::Executive]), None).unwrap();
    shell.navigate_path("/reports").unwrap();

    assert_eq!(
        shell.handle_key(KeyEvent::char('n'), false),
        Some(KeyCommand::Navigate(PageId::NewClaim))
    );
    assert_eq!(page(&shell.view()), (PageId::Dashboard, Role::Executive));
}

#[test]
fn search_overlay_opens_and_closes() {
    let (mut shell, _clock) = shell();
    shell.login(user(&[Role::Coder]), None).unwrap();

    shell.handle_key(KeyEvent::char('/'), false);
    assert!(shell.overlays().search_open);

    // Typing in the search box is not intercepted.
    assert_eq!(shell.handle_key(KeyEvent::char('n'), true), None);
    assert!(shell.overlays().search_open);

    assert_eq!(
        shell.handle_key(KeyEvent::escape(), true),
        Some(KeyCommand::CloseSearch)
    );
    assert!(!shell.overlays().search_open);
}

#[test]
fn sidebar_and_chat_toggles() {
    let (mut shell, _clock) = shell();
    shell.login(user(&[Role::Executive]), None).unwrap();

    assert!(shell.sidebar_open());
    assert!(!shell.toggle_sidebar());
    assert!(shell.toggle_sidebar());
    assert!(shell.toggle_chat());

    let sections = shell.sidebar().unwrap();
    assert_eq!(sections.len(), 1);
    let links: Vec<_> = shell.quick_links().unwrap().into_iter().map(|e| e.page).collect();
    assert_eq!(links, vec![PageId::Reports]);
}

#[test]
fn reload_restores_active_role() {
    let storage = MemoryStorage::new();
    let u = user(&[Role::Coder, Role::Billing]);

    {
        let (mut shell, _clock) = shell_with(storage.clone());
        shell.login(u.clone(), None).unwrap();
        shell.choose_role(Role::Billing).unwrap();
    }

    let persisted: PersistedSession = storage.load().unwrap().unwrap();
    assert_eq!(persisted.active_role, Some(Role::Billing));

    let (mut shell, _clock) = shell_with(storage);
    shell.resume(u, None, Utc::now()).unwrap();
    assert_eq!(page(&shell.view()), (PageId::Dashboard, Role::Billing));
}

#[test]
fn startup_resumes_with_the_saved_token() {
    let storage = MemoryStorage::new();
    let u = user(&[Role::Coder, Role::Billing]);
    let now = Utc::now();
    let token = SessionToken::new("saved", now, now + Duration::hours(1));

    {
        let (mut shell, _clock) = shell_with(storage.clone());
        shell.login(u.clone(), Some(token.clone())).unwrap();
        shell.choose_role(Role::Billing).unwrap();
    }

    let (mut shell, _clock) = shell_with(storage);
    let config = ShellConfig::default();
    let startup = config.startup_token(shell.session().storage(), now).unwrap();
    assert_eq!(startup, token);

    let outcome = shell.resume(u, Some(startup), now).unwrap();
    assert_eq!(outcome, RestoreOutcome::Resumed { active_role: Some(Role::Billing) });
    assert_eq!(shell.session().token(), Some(&token));
    assert_eq!(page(&shell.view()), (PageId::Dashboard, Role::Billing));
}

#[test]
fn configured_token_is_kept_on_first_sign_in() {
    let storage = MemoryStorage::new();
    let (mut shell, _clock) = shell_with(storage.clone());
    let now = Utc::now();
    let config = ShellConfig {
        auth_token: Some("from-env".to_string()),
        ..ShellConfig::default()
    };

    let token = config.startup_token(shell.session().storage(), now).unwrap();
    let outcome = shell.resume(user(&[Role::Coder]), Some(token), now).unwrap();
    assert_eq!(outcome, RestoreOutcome::Fresh);
    assert_eq!(shell.session().token().map(SessionToken::as_str), Some("from-env"));

    let saved = storage.load().unwrap().unwrap();
    assert_eq!(saved.token.as_ref().map(SessionToken::as_str), Some("from-env"));
}

#[test]
fn logout_clears_overlays_and_page() {
    let (mut shell, _clock) = shell();
    shell.login(user(&[Role::Admin]), None).unwrap();
    shell.handle_key(KeyEvent::char('/'), false);
    shell.toggle_chat();

    shell.logout().unwrap();
    assert_eq!(shell.view(), ShellView::SignedOut);
    assert!(shell.current().is_none());
    assert!(!shell.overlays().search_open);
    assert!(!shell.overlays().chat_open);
}

#[test]
fn claim_workspace_without_claim_redirects() {
    let (mut shell, _clock) = shell();
    shell.login(user(&[Role::Billing]), None).unwrap();
    shell.navigate_path("/eras").unwrap();

    let resolution = shell
        .navigate(NavigationRequest::page(PageId::ClaimWorkspace))
        .unwrap();
    assert_eq!(
        resolution,
        Resolution::MissingResource {
            requested: PageId::ClaimWorkspace,
            redirect_to: PageId::Dashboard,
        }
    );
    assert_eq!(shell.current_path().as_deref(), Some("/dashboard"));
    assert!(shell.take_notice().is_some());
}

#[test]
fn claim_path_with_reserved_characters_survives_reload() {
    let (mut shell, _clock) = shell();
    shell.login(user(&[Role::Auditor]), None).unwrap();

    shell
        .navigate(NavigationRequest::page(PageId::ClaimWorkspace).with_resource("A/B#c"))
        .unwrap();
    let path = shell.current_path().unwrap();
    assert_eq!(path, "/claim-workspace/A%2FB%23c");

    shell.navigate_path("/reports").unwrap();
    shell.navigate_path(&path).unwrap();
    let target = shell.current().unwrap();
    assert_eq!(target.page, PageId::ClaimWorkspace);
    assert_eq!(target.resource_id.as_deref(), Some("A/B#c"));
}

#[test]
fn signing_in_over_a_session_closes_previous_overlays() {
    let (mut shell, _clock) = shell();
    shell.login(user(&[Role::Admin]), None).unwrap();
    shell.handle_key(KeyEvent::char('/'), false);
    shell.toggle_chat();
    assert!(shell.overlays().search_open);

    let view = shell.login(user(&[Role::Coder, Role::Billing]), None).unwrap();
    assert!(matches!(view, ShellView::RoleChooser { .. }));
    assert!(!shell.overlays().search_open);
    assert!(!shell.overlays().chat_open);
    assert!(shell.take_notice().is_none());
}

#[test]
fn only_escape_passes_a_gate() {
    let (mut shell, _clock) = shell();
    let u = User::new(UserId::new(), "Noor", "noor@example.com", [Role::Coder]).unwrap();
    shell.login(u, None).unwrap();
    // Search cannot be opened while the legal modal is up.
    assert_eq!(shell.handle_key(KeyEvent::char('/'), false), None);
    assert!(!shell.overlays().search_open);

    shell.accept_legal(true, true).unwrap();
    shell.handle_key(KeyEvent::char('/'), false);
    assert!(shell.overlays().search_open);

    // A second user whose roles need choosing: search was reset on sign-in,
    // Escape still reaches the dispatcher and shortcuts stay inert.
    shell.login(user(&[Role::Coder, Role::Billing]), None).unwrap();
    assert_eq!(shell.handle_key(KeyEvent::escape(), false), None);
    assert_eq!(shell.handle_key(KeyEvent::char('g'), false), None);
    assert_eq!(shell.handle_key(KeyEvent::char('i'), false), None);
    assert_eq!(shell.view(), ShellView::RoleChooser { roles: vec![Role::Coder, Role::Billing] });
}

#[test]
fn role_missing_from_table_rejects_sign_in() {
    let storage = MemoryStorage::new();
    let mut shell = coder_only_shell(storage.clone());

    let err = shell.login(user(&[Role::Auditor]), None).unwrap_err();
    assert_eq!(err, ShellError::UnknownRole(claimdesk_auth::UnknownRoleError("auditor".to_string())));
    assert!(!shell.session().is_authenticated());
    assert_eq!(shell.view(), ShellView::SignedOut);
    assert!(storage.load().unwrap().is_none());

    // A multi-role user with one unknown role is rejected as a whole.
    assert!(shell.login(user(&[Role::Coder, Role::Auditor]), None).is_err());
    assert!(!shell.session().is_authenticated());

    // Known roles still sign in.
    let view = shell.login(user(&[Role::Coder]), None).unwrap();
    assert!(matches!(view, ShellView::Page(_)));
}

#[test]
fn resume_with_unknown_role_commits_nothing() {
    let storage = MemoryStorage::new();
    let mut shell = coder_only_shell(storage.clone());

    assert!(shell.resume(user(&[Role::Executive]), None, Utc::now()).is_err());
    assert!(!shell.session().is_authenticated());
    assert!(storage.load().unwrap().is_none());
}
