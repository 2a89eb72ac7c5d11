//! Key handling for the chat TUI.
//!
//! The input bar is always active: printable keys edit the topic buffer,
//! Enter submits, Alt+Enter inserts a newline (the topic input is
//! multi-line). Navigation keys scroll whichever pane is focused.

use std::sync::{Arc, Mutex};

use blogforge::ui::{self, Notice, UiState};
use crossterm::event::{KeyCode, KeyModifiers};

use crate::app::{ActivePane, App};

pub(crate) fn handle_key_event(
    key: crossterm::event::KeyEvent,
    app: &mut App,
    state: &Arc<Mutex<UiState>>,
) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            // Ctrl+C / Ctrl+Q always quit.
            KeyCode::Char('c') | KeyCode::Char('q') => {
                app.should_quit = true;
            }
            KeyCode::Char('l') => {
                app.show_logs = !app.show_logs;
                app.active_pane = if app.show_logs {
                    ActivePane::Log
                } else {
                    ActivePane::Transcript
                };
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
            app.input_buffer.push('\n');
        }
        KeyCode::Enter => submit(app, state),
        KeyCode::Backspace => {
            app.input_buffer.pop();
        }
        KeyCode::Esc => {
            app.input_buffer.clear();
            ui::clear_notice(state);
        }
        KeyCode::Tab | KeyCode::BackTab => {
            if app.show_logs {
                app.active_pane = match app.active_pane {
                    ActivePane::Transcript => ActivePane::Log,
                    ActivePane::Log => ActivePane::Transcript,
                };
            }
        }
        KeyCode::Up => scroll(app, 3),
        KeyCode::Down => scroll(app, -3),
        KeyCode::PageUp => scroll(app, 20),
        KeyCode::PageDown => scroll(app, -20),
        KeyCode::End => {
            *active_scroll_mut(app) = 0; // follow tail
        }
        KeyCode::Char(c) => {
            app.input_buffer.push(c);
        }
        _ => {}
    }
}

/// Validate and hand the typed topic to the session worker.
fn submit(app: &mut App, state: &Arc<Mutex<UiState>>) {
    if app.input_buffer.trim().is_empty() {
        // Rejected before any downstream call; the transcript is untouched.
        ui::set_notice(state, Notice::warning("Please enter a topic first."));
        return;
    }

    if !ui::submit_topic(state, app.input_buffer.clone()) {
        ui::set_notice(
            state,
            Notice::warning("Still generating \u{2014} wait for the current post."),
        );
        return;
    }

    app.input_buffer.clear();
    app.transcript_scroll = 0;
}

fn scroll(app: &mut App, delta: i64) {
    let offset = active_scroll_mut(app);
    *offset = if delta >= 0 {
        offset.saturating_add(delta as usize)
    } else {
        offset.saturating_sub((-delta) as usize)
    };
}

/// Mutable reference to the scroll offset of the focused pane.
fn active_scroll_mut(app: &mut App) -> &mut usize {
    match app.active_pane {
        ActivePane::Transcript => &mut app.transcript_scroll,
        ActivePane::Log => &mut app.log_scroll,
    }
}
