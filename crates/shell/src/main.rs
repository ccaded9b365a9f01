//! Line-driven front end for the shell.
//!
//! Reads one command per line from stdin and prints the resulting view, e.g.
//!
//! ```text
//! login Dana dana@example.com coder,billing
//! role billing
//! accept
//! go /claim-workspace/CLM-1001#notes
//! key g
//! key i
//! ```

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use chrono::Utc;

use claimdesk_auth::{RestoreOutcome, Role, SessionStorage, SessionStore, User};
use claimdesk_core::UserId;
use claimdesk_shell::api::models::ClaimFilter;
use claimdesk_shell::load::load_into;
use claimdesk_shell::{
    page_title, ApiClient, Key, KeyEvent, KeyboardDispatcher, LoadState, SearchHit, Shell, ShellConfig,
    ShellView, SystemClock,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    claimdesk_observability::init();

    let config = ShellConfig::from_env().context("invalid configuration")?;
    let table = config.permission_table().context("failed to load permission table")?;
    let storage = config.session_storage().context("failed to open session storage")?;
    let keyboard = KeyboardDispatcher::with_timeout(SystemClock, config.chord_timeout);
    let mut shell = Shell::new(table, SessionStore::new(storage), keyboard)?;

    let mut api = ApiClient::new(config.api_url.clone());
    if let Some(token) = config.startup_token(shell.session().storage(), Utc::now()) {
        tracing::info!("resuming session with authentication token");
        api.set_token(Some(token.value.clone()));
        match api.current_user().await {
            Ok(user) => {
                let outcome = shell.resume(user, Some(token), Utc::now())?;
                if matches!(outcome, RestoreOutcome::Discarded(_)) {
                    api.set_token(None);
                }
                tracing::info!(?outcome, "session restored");
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not fetch current user");
                api.set_token(None);
            }
        }
    }

    let mut claims: LoadState<Vec<claimdesk_shell::api::models::ClaimSummary>> = LoadState::Idle;

    print_view(&shell)?;
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let (cmd, rest) = line.trim().split_once(' ').unwrap_or((line.trim(), ""));
        let rest = rest.trim();

        let result: anyhow::Result<bool> = async {
            match cmd {
                "" => {}
                "quit" | "exit" => return Ok(false),
                "login" => {
                    let user = parse_login(rest)?;
                    shell.login(user, None)?;
                }
                "logout" => {
                    shell.logout()?;
                    api.set_token(None);
                }
                "role" => {
                    shell.choose_role(rest.parse::<Role>()?)?;
                }
                "accept" => {
                    shell.accept_legal(true, true)?;
                }
                "go" => {
                    shell.navigate_path(rest)?;
                }
                "open" => {
                    shell.navigate_legacy(rest)?;
                }
                "key" => {
                    let (name, focused) = match rest.split_once(' ') {
                        Some((name, flag)) => (name, flag == "focused"),
                        None => (rest, false),
                    };
                    let command = shell.handle_key(KeyEvent::new(Key::from_name(name)), focused);
                    println!("key -> {command:?}");
                }
                "sidebar" => {
                    for section in shell.sidebar()? {
                        let labels: Vec<_> = section.entries.iter().map(|e| e.label).collect();
                        println!("{}: {}", section.title, labels.join(", "));
                    }
                }
                "toggle-sidebar" => {
                    println!("sidebar open: {}", shell.toggle_sidebar());
                }
                "chat" => {
                    println!("chat open: {}", shell.toggle_chat());
                }
                "search" => {
                    for hit in shell.search(rest)? {
                        match hit {
                            SearchHit::Page(entry) => println!("  {} ({})", entry.label, entry.path),
                            SearchHit::Claim(req) => {
                                println!("  claim {}", req.resource_id.unwrap_or_default())
                            }
                        }
                    }
                }
                "claims" => {
                    let limit = if rest.is_empty() { 25 } else { rest.parse()? };
                    load_into(&mut claims, "claims", api.list_claims(limit)).await;
                    match &claims {
                        LoadState::Loaded(list) => {
                            for claim in ClaimFilter::default().apply(list) {
                                println!("  {} {} {:?} {:.2}", claim.id, claim.payer, claim.status, claim.billed_amount);
                            }
                        }
                        LoadState::Failed(msg) => println!("  {msg}"),
                        LoadState::Idle | LoadState::Loading => {}
                    }
                }
                other => bail!("unknown command '{other}'"),
            }
            Ok::<_, anyhow::Error>(true)
        }
        .await;

        match result {
            Ok(false) => break,
            Ok(true) => {}
            Err(err) => println!("error: {err}"),
        }
        if let Some(notice) = shell.take_notice() {
            println!("notice: {notice}");
        }
        print_view(&shell)?;
    }

    Ok(())
}

fn parse_login(rest: &str) -> anyhow::Result<User> {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    let [name, email, roles] = parts.as_slice() else {
        bail!("usage: login <name> <email> <role,role,...>");
    };
    let roles = roles
        .split(',')
        .map(str::parse::<Role>)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(User::new(UserId::new(), *name, *email, roles)?)
}

fn print_view<S, C>(shell: &Shell<S, C>) -> io::Result<()>
where
    S: SessionStorage,
    C: claimdesk_shell::Clock,
{
    let line = match shell.view() {
        ShellView::SignedOut => "[signed out]".to_string(),
        ShellView::RoleChooser { roles } => {
            let names: Vec<_> = roles.iter().map(Role::label).collect();
            format!("[choose a role] {}", names.join(" | "))
        }
        ShellView::LegalAcceptance { terms_pending, privacy_pending } => {
            format!("[accept legal] terms pending: {terms_pending}, privacy pending: {privacy_pending}")
        }
        ShellView::Page(target) => format!("{} @ {}", page_title(&target), target.path()),
    };
    let mut out = io::stdout().lock();
    writeln!(out, "{line}")?;
    out.flush()
}
