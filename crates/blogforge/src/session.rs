//! The per-session interaction loop.
//!
//! A [`Session`] owns the transcript for one interactive session and
//! drives the submit cycle: validate input, append the user entry, call
//! the model, append the assistant entry. The client is constructed once
//! at startup and passed in explicitly — there is no process-wide cached
//! instance.

use crate::transcript::{Transcript, TranscriptEntry};
use crate::{AppConfig, ContentModel, GenerateError, prompt};
use tracing::{debug, info};

/// Result of one submit cycle, inspected by the frontend to decide which
/// notice to show.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was blank or whitespace-only; the transcript is unchanged.
    EmptyTopic,
    /// Generation succeeded; user and assistant entries were appended.
    Generated,
    /// Generation failed; only the user entry was appended. The session
    /// remains usable for further attempts.
    Failed(GenerateError),
}

/// One user's interactive session: a transcript plus a borrowed model
/// client and configuration.
pub struct Session<'a> {
    client: &'a dyn ContentModel,
    config: AppConfig,
    transcript: Transcript,
}

impl<'a> Session<'a> {
    /// Start a fresh session with an empty transcript.
    pub fn new(client: &'a dyn ContentModel, config: AppConfig) -> Self {
        Self {
            client,
            config,
            transcript: Transcript::new(),
        }
    }

    /// The session's transcript, in display order.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The session configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run one submit cycle for raw user input.
    ///
    /// The model call is awaited inline: no other mutation of this
    /// session happens while a generation is in flight.
    pub async fn submit(&mut self, input: &str) -> SubmitOutcome {
        let topic = input.trim();
        if topic.is_empty() {
            debug!("Rejected blank submission");
            return SubmitOutcome::EmptyTopic;
        }

        self.transcript.append(TranscriptEntry::user(topic));

        let built = prompt::content_prompt(topic);
        info!("Generating content for topic ({} chars)", topic.len());

        match self.client.generate(&self.config.model, &built).await {
            Ok(content) => {
                info!("Generation succeeded ({} chars)", content.len());
                self.transcript.append(TranscriptEntry::assistant(content));
                SubmitOutcome::Generated
            }
            Err(err) => {
                // Captured, surfaced to the caller, non-fatal: no
                // assistant entry is appended.
                info!("Generation failed: {err}");
                SubmitOutcome::Failed(err)
            }
        }
    }
}
