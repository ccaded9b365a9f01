//! Keyboard command dispatcher.
//!
//! Grammar:
//! - `/` opens search, `n` starts a new claim.
//! - `g` (or `G`) arms a chord; a following `i`, `a`, `e`, `d` or `r` within
//!   the timeout jumps to inbox, acks, ERAs, denials or reports.
//! - `Escape` closes search whatever else is going on.
//!
//! Nothing but `Escape` is intercepted while a text field has focus, and keys
//! held with ctrl/alt/meta are left to the browser/OS.

use chrono::{DateTime, Duration, Utc};

use claimdesk_auth::PageId;

use crate::clock::Clock;

pub const DEFAULT_CHORD_TIMEOUT_MS: i64 = 1000;

/// Second key of a `g` chord and the page it opens.
pub const CHORD_TARGETS: [(char, PageId); 5] = [
    ('i', PageId::ClaimsInbox),
    ('a', PageId::Acknowledgements),
    ('e', PageId::Eras),
    ('d', PageId::Denials),
    ('r', PageId::Reports),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
    /// Any key the dispatcher has no use for (arrows, function keys, ...).
    Other,
}

impl Key {
    /// Parse a DOM-style key name (`"g"`, `"/"`, `"Escape"`, `"ArrowUp"`).
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("escape") || name.eq_ignore_ascii_case("esc") {
            return Key::Escape;
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Key::Char(c),
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn char(c: char) -> Self {
        Self::new(Key::Char(c))
    }

    pub fn escape() -> Self {
        Self::new(Key::Escape)
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// UI facts the dispatcher needs but does not own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyContext {
    pub text_input_focused: bool,
    pub search_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    OpenSearch,
    CloseSearch,
    Navigate(PageId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordState {
    Idle,
    AwaitingChord { since: DateTime<Utc> },
}

pub struct KeyboardDispatcher<C> {
    clock: C,
    timeout: Duration,
    state: ChordState,
}

impl<C: Clock> KeyboardDispatcher<C> {
    pub fn new(clock: C) -> Self {
        Self::with_timeout(clock, Duration::milliseconds(DEFAULT_CHORD_TIMEOUT_MS))
    }

    pub fn with_timeout(clock: C, timeout: Duration) -> Self {
        Self {
            clock,
            timeout,
            state: ChordState::Idle,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Current state, with an expired chord reported as `Idle`.
    pub fn state(&self) -> ChordState {
        match self.state {
            ChordState::AwaitingChord { since } if self.expired(since) => ChordState::Idle,
            state => state,
        }
    }

    fn expired(&self, since: DateTime<Utc>) -> bool {
        self.clock.now() - since >= self.timeout
    }

    /// Feed one key press; returns the command it triggers, if any.
    pub fn handle(&mut self, event: KeyEvent, ctx: KeyContext) -> Option<KeyCommand> {
        if event.key == Key::Escape {
            self.state = ChordState::Idle;
            return ctx.search_open.then_some(KeyCommand::CloseSearch);
        }

        if ctx.text_input_focused || event.modifiers.any() {
            self.state = ChordState::Idle;
            return None;
        }

        let Key::Char(c) = event.key else {
            self.state = ChordState::Idle;
            return None;
        };

        match self.state() {
            ChordState::Idle => match c {
                '/' => Some(KeyCommand::OpenSearch),
                'n' => Some(KeyCommand::Navigate(PageId::NewClaim)),
                'g' | 'G' => {
                    self.state = ChordState::AwaitingChord {
                        since: self.clock.now(),
                    };
                    None
                }
                _ => None,
            },
            ChordState::AwaitingChord { .. } => {
                self.state = ChordState::Idle;
                let target = chord_target(c);
                if target.is_none() {
                    tracing::debug!(key = %c, "unmapped chord key");
                }
                target.map(KeyCommand::Navigate)
            }
        }
    }
}

pub fn chord_target(c: char) -> Option<PageId> {
    let c = c.to_ascii_lowercase();
    CHORD_TARGETS
        .iter()
        .find(|(key, _)| *key == c)
        .map(|(_, page)| *page)
}
