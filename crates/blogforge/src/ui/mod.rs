//! Shared UI state between the session worker and a frontend.
//!
//! ```text
//! Session worker ──writes──▶ Arc<Mutex<UiState>> ◀──reads── TUI frontend
//! ```
//!
//! The worker mirrors transcript growth, notices, and the generating flag
//! into [`UiState`]; the frontend reads the same state to render and
//! writes user submissions into the `pending_topic` slot, which the
//! worker polls. This module has no rendering dependencies — just data
//! types and convenience updaters.

pub mod tracing;

use crate::transcript::TranscriptEntry;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Maximum captured log lines kept in memory.
pub const MAX_LOG_LINES: usize = 2000;
/// Trim to this many when the cap is exceeded.
pub const LOG_TRIM_TO: usize = 1200;

// ── Notices ───────────────────────────────────────────────────────────

/// Severity of a user-facing notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// A transient, user-facing message shown by the frontend (blank-input
/// warnings, generation failures, success toasts).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

// ── Log types ─────────────────────────────────────────────────────────

/// A single log line captured from tracing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogLine {
    pub time: String,
    pub level: LogLevel,
    pub message: String,
}

/// Log severity level (mirrors tracing levels).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Short fixed-width label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO ",
            Self::Warn => "WARN ",
            Self::Error => "ERROR",
        }
    }
}

// ── UiState ───────────────────────────────────────────────────────────

/// Core UI state shared between the session worker and a frontend.
pub struct UiState {
    /// Model identifier shown in the status bar.
    pub model: String,
    /// True while a generation call is in flight.
    pub generating: bool,
    /// Mirror of the session transcript, in display order.
    pub entries: Vec<TranscriptEntry>,
    /// The current transient notice, if any.
    pub notice: Option<Notice>,
    /// Captured tracing log lines.
    pub logs: Vec<LogLine>,
    /// Set to `false` when the worker shuts down.
    pub running: bool,
    /// The frontend sets this to `true` when the user requests quit.
    pub quit_requested: bool,
    /// Topic submitted by the frontend, awaiting pickup by the worker.
    pub pending_topic: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            model: String::new(),
            generating: false,
            entries: Vec::new(),
            notice: None,
            logs: Vec::new(),
            running: true,
            quit_requested: false,
            pending_topic: None,
        }
    }
}

// ── Convenience updaters ──────────────────────────────────────────────

/// Lock the shared state mutex and run a closure on the guard.
/// Silently ignores poisoned locks (no log spam inside frontends).
macro_rules! with_state {
    ($state:expr, |$s:ident| $body:block) => {
        if let Ok(mut $s) = $state.lock() {
            $body
        }
    };
}

/// Mirror a new transcript entry into the shared state.
pub fn push_entry(state: &Arc<Mutex<UiState>>, entry: TranscriptEntry) {
    with_state!(state, |s| { s.entries.push(entry) });
}

/// Set or clear the generating flag.
pub fn set_generating(state: &Arc<Mutex<UiState>>, generating: bool) {
    with_state!(state, |s| { s.generating = generating });
}

/// Show a notice, replacing any previous one.
pub fn set_notice(state: &Arc<Mutex<UiState>>, notice: Notice) {
    with_state!(state, |s| { s.notice = Some(notice) });
}

/// Clear the current notice.
pub fn clear_notice(state: &Arc<Mutex<UiState>>) {
    with_state!(state, |s| { s.notice = None });
}

/// Hand a submitted topic to the worker.
///
/// Returns `false` (and leaves the state untouched) when a generation is
/// already in flight or an earlier submission has not been picked up yet
/// — the session processes one topic at a time.
pub fn submit_topic(state: &Arc<Mutex<UiState>>, topic: impl Into<String>) -> bool {
    match state.lock() {
        Ok(mut s) => {
            if s.generating || s.pending_topic.is_some() {
                return false;
            }
            s.pending_topic = Some(topic.into());
            true
        }
        Err(_) => false,
    }
}

/// Take the pending submission, if any. Called by the worker loop.
pub fn poll_submission(state: &Arc<Mutex<UiState>>) -> Option<String> {
    state.lock().ok().and_then(|mut s| s.pending_topic.take())
}

// ── Tests ─────────────────────────────────────────────────────────────
