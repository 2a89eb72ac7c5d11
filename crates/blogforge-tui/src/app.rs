//! TUI-local state (not shared with the session worker).

/// Which pane currently receives scroll input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ActivePane {
    Transcript,
    Log,
}

/// TUI-local state (not shared with the session worker).
pub(crate) struct App {
    /// The multi-line topic being typed.
    pub(crate) input_buffer: String,
    /// Which pane is focused for scrolling (toggled with Tab).
    pub(crate) active_pane: ActivePane,
    /// Whether the logs pane is visible (toggled with Ctrl+L).
    pub(crate) show_logs: bool,
    /// Offset from the bottom of the transcript (0 = follow tail).
    pub(crate) transcript_scroll: usize,
    /// Offset from the bottom of the log (0 = follow tail).
    pub(crate) log_scroll: usize,
    /// Frame counter driving the generating spinner.
    pub(crate) tick: u64,
    pub(crate) should_quit: bool,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            input_buffer: String::new(),
            active_pane: ActivePane::Transcript,
            show_logs: false,
            transcript_scroll: 0,
            log_scroll: 0,
            tick: 0,
            should_quit: false,
        }
    }
}
