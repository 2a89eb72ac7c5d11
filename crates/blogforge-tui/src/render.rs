//! Rendering for the chat TUI.

use std::sync::{Arc, Mutex};

use blogforge::transcript::{Role, TranscriptEntry};
use blogforge::ui::{LogLevel, LogLine, Notice, NoticeKind, UiState};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{ActivePane, App};
use crate::markdown::markdown_lines;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Pick the spinner frame for a tick count.
pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER[(tick / 2) as usize % SPINNER.len()]
}

/// Map a log level to a ratatui [`Style`].
pub fn log_level_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Trace => Style::default().fg(Color::DarkGray),
        LogLevel::Debug => Style::default().fg(Color::Cyan),
        LogLevel::Info => Style::default().fg(Color::Green),
        LogLevel::Warn => Style::default().fg(Color::Yellow),
        LogLevel::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

fn notice_style(kind: NoticeKind) -> Style {
    match kind {
        NoticeKind::Info => Style::default().fg(Color::Green),
        NoticeKind::Warning => Style::default().fg(Color::Yellow),
        NoticeKind::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

// ── Root render ───────────────────────────────────────────────────────

/// Snapshot of the `UiState` fields needed for one frame.
///
/// Everything is cloned in one shot so the shared lock is held only for
/// the clone, never during widget construction.
struct RenderSnapshot {
    model: String,
    generating: bool,
    running: bool,
    entries: Vec<TranscriptEntry>,
    notice: Option<Notice>,
    logs: Vec<LogLine>,
}

pub(crate) fn render(frame: &mut Frame, state: &Arc<Mutex<UiState>>, app: &App) {
    let area = frame.area();

    // Outer layout: [4] status | [flex] transcript (+logs) | [4] input bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(6),
            Constraint::Length(4),
        ])
        .split(area);

    let snap = {
        let s = state.lock().unwrap();
        RenderSnapshot {
            model: s.model.clone(),
            generating: s.generating,
            running: s.running,
            entries: s.entries.clone(),
            notice: s.notice.clone(),
            logs: if app.show_logs {
                s.logs.clone()
            } else {
                Vec::new()
            },
        }
        // lock released here
    };

    render_status(frame, chunks[0], &snap, app);
    render_input(frame, chunks[2], &snap, app);

    if app.show_logs {
        let mid = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[1]);
        render_transcript(frame, mid[0], &snap, app);
        render_logs(frame, mid[1], &snap.logs, app);
    } else {
        render_transcript(frame, chunks[1], &snap, app);
    }
}

// ── Status bar ────────────────────────────────────────────────────────

fn render_status(frame: &mut Frame, area: Rect, snap: &RenderSnapshot, app: &App) {
    let phase = if !snap.running {
        Span::styled("Stopped", Style::default().fg(Color::Red))
    } else if snap.generating {
        Span::styled(
            format!("{} Generating", spinner_frame(app.tick)),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("Ready", Style::default().fg(Color::Green))
    };

    let exchange_count = snap
        .entries
        .iter()
        .filter(|e| e.role == Role::User)
        .count();

    let text = vec![
        Line::from(vec![
            Span::styled(
                "Blogforge",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                " \u{2014} chat-style blog content generator",
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(vec![
            Span::styled("Model: ", Style::default().fg(Color::DarkGray)),
            Span::raw(snap.model.clone()),
            Span::raw("   "),
            phase,
            Span::raw("   "),
            Span::styled("Topics: ", Style::default().fg(Color::DarkGray)),
            Span::styled(exchange_count.to_string(), Style::default().fg(Color::Cyan)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));

    frame.render_widget(Paragraph::new(text).block(block), area);
}

// ── Transcript pane ───────────────────────────────────────────────────

/// Build the full transcript as styled lines: compact labeled bubbles for
/// user topics, expanded Markdown for assistant content.
pub(crate) fn transcript_lines(
    entries: &[TranscriptEntry],
    generating: bool,
    tick: u64,
) -> Vec<Line<'static>> {
    let user_label = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let assistant_label = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line<'static>> = Vec::new();

    for entry in entries {
        match entry.role {
            Role::User => {
                if !lines.is_empty() {
                    lines.push(Line::default());
                }
                let topic = entry.topic.clone().unwrap_or_default();
                let mut parts = topic.lines();
                let first = parts.next().unwrap_or_default().to_string();
                lines.push(Line::from(vec![
                    Span::styled("You \u{276f} ", user_label),
                    Span::styled(first, Style::default().fg(Color::Cyan)),
                ]));
                for extra in parts {
                    lines.push(Line::from(Span::styled(
                        format!("      {extra}"),
                        Style::default().fg(Color::Cyan),
                    )));
                }
            }
            Role::Assistant => {
                lines.push(Line::from(Span::styled("Blogforge", assistant_label)));
                lines.extend(markdown_lines(entry.content.as_deref().unwrap_or_default()));
            }
        }
    }

    if generating {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            format!("{} Writing your post\u{2026}", spinner_frame(tick)),
            Style::default().fg(Color::Yellow),
        )));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Type a topic below and press Enter to generate a blog post.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines
}

fn render_transcript(frame: &mut Frame, area: Rect, snap: &RenderSnapshot, app: &App) {
    let inner_height = area.height.saturating_sub(2) as usize;
    let lines = transcript_lines(&snap.entries, snap.generating, app.tick);

    let total = lines.len();
    let scroll = total
        .saturating_sub(inner_height)
        .saturating_sub(app.transcript_scroll);

    let border_color = if app.active_pane == ActivePane::Transcript {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Transcript ");

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll as u16, 0))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

// ── Log pane ──────────────────────────────────────────────────────────

fn render_logs(frame: &mut Frame, area: Rect, logs: &[LogLine], app: &App) {
    let inner_height = area.height.saturating_sub(2) as usize;

    let mut lines: Vec<Line> = Vec::with_capacity(logs.len());
    for log in logs {
        // Trace-level lines are too noisy for the TUI.
        if matches!(log.level, LogLevel::Trace) {
            continue;
        }
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", log.time),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(format!("{} ", log.level.label()), log_level_style(log.level)),
            Span::raw(&log.message),
        ]));
    }

    let total = lines.len();
    let scroll = total
        .saturating_sub(inner_height)
        .saturating_sub(app.log_scroll);

    let border_color = if app.active_pane == ActivePane::Log {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Log ");

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll as u16, 0))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

// ── Input bar ─────────────────────────────────────────────────────────

fn render_input(frame: &mut Frame, area: Rect, snap: &RenderSnapshot, app: &App) {
    let (title, border_style) = match snap.notice {
        Some(ref notice) => (format!(" {} ", notice.text), notice_style(notice.kind)),
        None => (
            " [Enter] generate  [Alt+Enter] newline  [Ctrl+L] logs  [Ctrl+C] quit ".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    };

    // Show the tail of the buffer: the last line gets the cursor block.
    let mut lines: Vec<Line> = app
        .input_buffer
        .lines()
        .map(|l| Line::from(format!("> {l}")))
        .collect();
    match lines.last_mut() {
        Some(last) => last.push_span(Span::raw("\u{2588}")),
        None => lines.push(Line::from("> \u{2588}")),
    }
    let visible = lines.len().saturating_sub(2);
    let lines: Vec<Line> = lines.into_iter().skip(visible).collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn spinner_cycles() {
        assert_eq!(spinner_frame(0), SPINNER[0]);
        assert_eq!(spinner_frame(2), SPINNER[1]);
        assert_eq!(spinner_frame(2 * SPINNER.len() as u64), SPINNER[0]);
    }

    #[test]
    fn empty_transcript_shows_the_hint() {
        let lines = transcript_lines(&[], false, 0);
        assert_eq!(lines.len(), 1);
        assert!(text_of(&lines)[0].contains("Type a topic"));
    }

    #[test]
    fn user_entries_render_as_compact_bubbles() {
        let entries = vec![TranscriptEntry::user("solar power")];
        let rendered = text_of(&transcript_lines(&entries, false, 0));
        assert!(rendered.iter().any(|l| l.contains("You \u{276f} solar power")));
    }

    #[test]
    fn multiline_topics_keep_their_extra_lines() {
        let entries = vec![TranscriptEntry::user("line one\nline two")];
        let rendered = text_of(&transcript_lines(&entries, false, 0));
        assert!(rendered.iter().any(|l| l.contains("line one")));
        assert!(rendered.iter().any(|l| l.contains("line two")));
    }

    #[test]
    fn assistant_entries_render_markdown_under_a_label() {
        let entries = vec![
            TranscriptEntry::user("topic"),
            TranscriptEntry::assistant("# Title\n\n- point"),
        ];
        let rendered = text_of(&transcript_lines(&entries, false, 0));
        let label_idx = rendered.iter().position(|l| l == "Blogforge").unwrap();
        assert!(rendered[label_idx..].iter().any(|l| l.contains("Title")));
        assert!(rendered[label_idx..].iter().any(|l| l.contains("\u{2022} point")));
    }

    #[test]
    fn generating_appends_a_spinner_line() {
        let entries = vec![TranscriptEntry::user("topic")];
        let rendered = text_of(&transcript_lines(&entries, true, 4));
        assert!(rendered.last().unwrap().contains("Writing your post"));
    }

    #[test]
    fn entries_render_in_insertion_order() {
        let entries = vec![
            TranscriptEntry::user("first"),
            TranscriptEntry::assistant("alpha"),
            TranscriptEntry::user("second"),
        ];
        let rendered = text_of(&transcript_lines(&entries, false, 0));
        let first = rendered.iter().position(|l| l.contains("first")).unwrap();
        let alpha = rendered.iter().position(|l| l.contains("alpha")).unwrap();
        let second = rendered.iter().position(|l| l.contains("second")).unwrap();
        assert!(first < alpha && alpha < second);
    }
}
