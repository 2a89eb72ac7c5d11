//! Terminal chat frontend for `blogforge`.
//!
//! Renders the shared [`UiState`] from the core crate as a chat
//! transcript (ratatui + crossterm) with an always-active topic input
//! bar. The session worker runs elsewhere; the TUI reads the state for
//! rendering and writes submissions and the quit request back into it.
//!
//! # Quick start
//!
//! ```ignore
//! use blogforge_tui::{TuiConfig, spawn_tui};
//! use blogforge::ui::UiState;
//! use std::sync::{Arc, Mutex};
//!
//! let state = Arc::new(Mutex::new(UiState::default()));
//! let handle = spawn_tui(state.clone(), TuiConfig::default());
//! // ... run the session worker, update state ...
//! handle.join().unwrap();
//! ```

use std::io;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use blogforge::ui::UiState;
use blogforge::ui::tracing::LogBuffer;
use crossterm::event::{self, Event};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{cursor, execute};
use ratatui::prelude::*;

mod app;
mod input;
pub mod markdown;
mod render;

pub use markdown::markdown_lines;
pub use render::{log_level_style, spinner_frame};

use app::App;
use input::handle_key_event;
use render::render;

/// Configuration for the TUI.
#[derive(Default)]
pub struct TuiConfig {
    /// Optional log buffer from the tracing layer.
    ///
    /// When set, the TUI drains pending log lines from this buffer once
    /// per frame and merges them into `UiState::logs`, keeping log calls
    /// decoupled from the render thread's state lock.
    pub log_buffer: Option<LogBuffer>,
}

/// Spawn the TUI on a dedicated OS thread.
pub fn spawn_tui(state: Arc<Mutex<UiState>>, config: TuiConfig) -> JoinHandle<()> {
    std::thread::spawn(move || {
        if let Err(e) = run_tui(state, &config) {
            eprintln!("TUI error: {e}");
        }
    })
}

/// Run the TUI event loop (blocking). Call this from a dedicated OS thread.
///
/// Returns when the user quits (Ctrl+C / Ctrl+Q) or another component
/// sets `quit_requested`.
pub fn run_tui(state: Arc<Mutex<UiState>>, config: &TuiConfig) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let mut app = App::new();

    loop {
        let quit = {
            let s = state.lock().unwrap();
            s.quit_requested
        };
        if app.should_quit || quit {
            state.lock().unwrap().quit_requested = true;
            break;
        }

        // Flush pending log lines from the tracing layer before rendering.
        if let Some(ref log_buf) = config.log_buffer {
            log_buf.flush_into(&state);
        }

        app.tick = app.tick.wrapping_add(1);
        terminal.draw(|frame| {
            render(frame, &state, &app);
        })?;

        // Poll for input events (100ms timeout keeps the spinner moving).
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
        {
            handle_key_event(key, &mut app, &state);
        }
    }

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tui_config_default_has_no_log_buffer() {
        let config = TuiConfig::default();
        assert!(config.log_buffer.is_none());
    }

    #[test]
    fn app_defaults() {
        let app = App::new();
        assert!(!app.should_quit);
        assert!(!app.show_logs);
        assert!(app.input_buffer.is_empty());
        assert_eq!(app.transcript_scroll, 0);
        assert_eq!(app.log_scroll, 0);
        assert_eq!(app.tick, 0);
    }
}
