//! Tracing layer that captures log events for the frontend's log pane.
//!
//! Events land in a [`LogBuffer`] with its own mutex, separate from the
//! `UiState` lock, so a log call from the worker can never block the
//! render thread. The frontend drains the buffer once per frame.

use std::sync::{Arc, Mutex};

use chrono::Local;
use tracing::Subscriber;
use tracing_subscriber::layer::Layer;
use tracing_subscriber::registry::LookupSpan;

use super::{LOG_TRIM_TO, LogLevel, LogLine, MAX_LOG_LINES};

/// Shared buffer of pending log lines.
#[derive(Clone)]
pub struct LogBuffer(Arc<Mutex<Vec<LogLine>>>);

impl LogBuffer {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(Vec::with_capacity(128))))
    }

    /// Drain all pending log lines, returning them.
    pub fn drain(&self) -> Vec<LogLine> {
        let mut buf = self.0.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *buf)
    }

    /// Drain pending lines directly into `UiState::logs`, respecting the
    /// trim limits. Acquires the `UiState` lock only when there are new
    /// lines.
    pub fn flush_into(&self, state: &Arc<Mutex<super::UiState>>) {
        let lines = self.drain();
        if lines.is_empty() {
            return;
        }
        if let Ok(mut s) = state.lock() {
            s.logs.extend(lines);
            if s.logs.len() > MAX_LOG_LINES {
                let trim = s.logs.len() - LOG_TRIM_TO;
                s.logs.drain(..trim);
            }
        }
    }

    fn push(&self, line: LogLine) {
        if let Ok(mut buf) = self.0.lock() {
            buf.push(line);
            // Cap the buffer so a burst before the next drain stays bounded.
            if buf.len() > MAX_LOG_LINES {
                let trim = buf.len() - LOG_TRIM_TO;
                buf.drain(..trim);
            }
        }
    }
}

/// A [`tracing_subscriber::Layer`] feeding a [`LogBuffer`].
pub struct UiTracingLayer {
    buffer: LogBuffer,
}

impl UiTracingLayer {
    /// Create the layer and its associated [`LogBuffer`].
    pub fn new() -> (Self, LogBuffer) {
        let buffer = LogBuffer::new();
        (
            Self {
                buffer: buffer.clone(),
            },
            buffer,
        )
    }
}

impl<S: Subscriber + for<'a> LookupSpan<'a>> Layer<S> for UiTracingLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let level = match *event.metadata().level() {
            tracing::Level::TRACE => LogLevel::Trace,
            tracing::Level::DEBUG => LogLevel::Debug,
            tracing::Level::INFO => LogLevel::Info,
            tracing::Level::WARN => LogLevel::Warn,
            tracing::Level::ERROR => LogLevel::Error,
        };

        self.buffer.push(LogLine {
            time: Local::now().format("%H:%M:%S").to_string(),
            level,
            message: visitor.message,
        });
    }
}

/// Visitor that extracts the event message, appending any extra fields
/// as `key=value` pairs.
#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl MessageVisitor {
    fn append_field(&mut self, name: &str, value: String) {
        if !self.message.is_empty() {
            self.message.push(' ');
        }
        self.message.push_str(name);
        self.message.push('=');
        self.message.push_str(&value);
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
            // Strip the quotes debug-formatting adds around plain strings.
            if self.message.len() >= 2
                && self.message.starts_with('"')
                && self.message.ends_with('"')
            {
                self.message = self
                    .message
                    .trim_start_matches('"')
                    .trim_end_matches('"')
                    .to_string();
            }
        } else {
            self.append_field(field.name(), format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.append_field(field.name(), value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::UiState;

    #[test]
    fn drain_empties_the_buffer() {
        let (_layer, buffer) = UiTracingLayer::new();
        buffer.push(LogLine {
            time: "12:00:00".into(),
            level: LogLevel::Info,
            message: "hello".into(),
        });

        let lines = buffer.drain();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].message, "hello");
        assert!(buffer.drain().is_empty());
    }

    #[test]
    fn flush_into_respects_the_cap() {
        let (_layer, buffer) = UiTracingLayer::new();
        let state = Arc::new(Mutex::new(UiState::default()));

        for i in 0..(MAX_LOG_LINES + 100) {
            buffer.push(LogLine {
                time: "12:00:00".into(),
                level: LogLevel::Debug,
                message: format!("line {i}"),
            });
            // Flush in batches so the UiState side does the trimming too.
            if i % 500 == 0 {
                buffer.flush_into(&state);
            }
        }
        buffer.flush_into(&state);

        let s = state.lock().unwrap();
        assert!(s.logs.len() <= MAX_LOG_LINES);
        // The newest line survives trimming.
        assert!(
            s.logs
                .last()
                .unwrap()
                .message
                .contains(&(MAX_LOG_LINES + 99).to_string())
        );
    }

    #[test]
    fn flush_into_without_lines_is_a_noop() {
        let (_layer, buffer) = UiTracingLayer::new();
        let state = Arc::new(Mutex::new(UiState::default()));
        buffer.flush_into(&state);
        assert!(state.lock().unwrap().logs.is_empty());
    }
}
