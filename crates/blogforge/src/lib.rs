//! Chat-style blog content generator backed by Google's Gemini API.
//!
//! `blogforge` turns a user-supplied topic into a complete, sectioned
//! Markdown blog post. The core pieces are deliberately small:
//!
//! - [`prompt::content_prompt`] — pure function mapping a topic string to
//!   the full instruction prompt (topic embedded verbatim).
//! - [`GeminiClient`] — one outbound call to the `generateContent`
//!   endpoint. Failures come back as a typed [`GenerateError`], never as
//!   a panic or an unwound exception.
//! - [`transcript::Transcript`] — an append-only, session-scoped log of
//!   user/assistant exchanges, consumed by a frontend for rendering.
//! - [`session::Session`] — the interaction loop: validate input, append
//!   the user entry, call the model, append the assistant entry.
//!
//! The interactive chat frontend lives in the sibling `blogforge-tui`
//! crate; this crate also ships a one-shot `blogforge` CLI for scripted
//! generation.
//!
//! # Getting started
//!
//! ```ignore
//! use blogforge::{AppConfig, GeminiClient, session::Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), String> {
//!     let api_key = std::env::var("GOOGLE_API_KEY").unwrap_or_default();
//!     let client = GeminiClient::new(api_key)?;
//!     let config = AppConfig::default();
//!
//!     let mut session = Session::new(&client, config);
//!     let outcome = session.submit("renewable energy in rural areas").await;
//!     println!("{outcome:?}, transcript has {} entries", session.transcript().len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod prompt;
pub mod session;
pub mod transcript;
pub mod ui;

pub use config::AppConfig;

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

// ── Constants ──────────────────────────────────────────────────────

/// Base URL of the Gemini generative-language API.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for all generation calls.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

// ── Request types ──────────────────────────────────────────────────

/// `generateContent` request body. Unused optional fields are omitted
/// from serialization.
#[derive(Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// A single conversation turn sent to the API.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

impl Content {
    /// A user turn with one text part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".into()),
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// A text fragment inside a [`Content`] turn.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Part {
    pub text: String,
}

/// Sampling and output-size parameters for a generation call.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

// ── Response types ─────────────────────────────────────────────────

/// Raw API response (internal deserialization target).
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawGenerateResponse {
    candidates: Option<Vec<RawCandidate>>,
    error: Option<ApiErrorBody>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawCandidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<u16>,
    message: String,
}

/// Token usage statistics reported by the API.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
    pub total_token_count: Option<u32>,
}

// ── Errors ─────────────────────────────────────────────────────────

/// Typed failure reason for a generation call.
///
/// Every failure mode at the API boundary is captured here and inspected
/// by the caller — nothing unwinds past [`GeminiClient::generate`]. None
/// of these are fatal to a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// No API key was available at call time. The client is constructed
    /// in a degraded state when the key is absent; the failure surfaces
    /// here, on the first call, not at startup.
    MissingKey,
    /// The HTTP request itself failed (connect, DNS, timeout, body read).
    Transport(String),
    /// The API answered with an error status or an error body.
    Api { status: u16, message: String },
    /// The response was syntactically or structurally unusable.
    Malformed(String),
    /// A well-formed response that carried no text.
    EmptyResponse,
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::MissingKey => {
                write!(f, "{API_KEY_ENV} is not set; generation is unavailable")
            }
            GenerateError::Transport(msg) => write!(f, "request failed: {msg}"),
            GenerateError::Api { status, message } => {
                write!(f, "Gemini API error (HTTP {status}): {message}")
            }
            GenerateError::Malformed(msg) => write!(f, "malformed response: {msg}"),
            GenerateError::EmptyResponse => write!(f, "model returned no text"),
        }
    }
}

impl std::error::Error for GenerateError {}

// ── Model seam ─────────────────────────────────────────────────────

/// Boxed future returned by [`ContentModel::generate`].
pub type GenerateFuture<'a> =
    std::pin::Pin<Box<dyn Future<Output = Result<String, GenerateError>> + Send + 'a>>;

/// The seam between the session loop and the network.
///
/// [`GeminiClient`] is the production implementor; tests substitute a
/// stub that returns canned text or a canned failure.
pub trait ContentModel: Send + Sync {
    /// Generate text for a fully built prompt. One call, no retries.
    fn generate<'a>(&'a self, model: &'a str, prompt: &'a str) -> GenerateFuture<'a>;
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for the Gemini `generateContent` API.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    generation_config: GenerationConfig,
}

impl GeminiClient {
    /// Create a new client with the given API key.
    ///
    /// An empty key is accepted — the process keeps running in a degraded
    /// state and every generation attempt fails with
    /// [`GenerateError::MissingKey`]. The only construction failure is the
    /// underlying HTTP client failing to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, String> {
        Self::with_base_url(api_key, GEMINI_API_BASE)
    }

    /// Create a client against a custom API base URL.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .user_agent("blogforge/0.1")
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
            generation_config: GenerationConfig {
                temperature: None,
                max_output_tokens: None,
            },
        })
    }

    /// Set the generation parameters sent with every request.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = config;
        self
    }

    /// Whether a (non-empty) API key is configured.
    pub fn has_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Send one generation request and return the produced text.
    pub async fn generate_text(&self, model: &str, prompt: &str) -> Result<String, GenerateError> {
        if self.api_key.is_empty() {
            return Err(GenerateError::MissingKey);
        }

        let body = GenerateRequest {
            contents: vec![Content::user_text(prompt)],
            generation_config: Some(self.generation_config.clone()),
        };

        debug!(
            "Gemini request: model={}, prompt={} chars, max_tokens={:?}, temp={:?}",
            model,
            prompt.len(),
            self.generation_config.max_output_tokens,
            self.generation_config.temperature,
        );

        let url = format!("{}/models/{model}:generateContent", self.base_url);
        let start = Instant::now();

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| GenerateError::Transport(format!("failed to read response: {e}")))?;

        debug!(
            "Gemini response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        let parsed: RawGenerateResponse = serde_json::from_str(&text).map_err(|e| {
            if status.is_success() {
                GenerateError::Malformed(e.to_string())
            } else {
                // Non-JSON error bodies (proxies, gateways) still map to Api.
                GenerateError::Api {
                    status: status.as_u16(),
                    message: truncate_for_notice(&text, 200),
                }
            }
        })?;

        if let Some(ref usage) = parsed.usage_metadata {
            debug!(
                "Token usage: prompt={}, candidates={}, total={}",
                usage.prompt_token_count.unwrap_or(0),
                usage.candidates_token_count.unwrap_or(0),
                usage.total_token_count.unwrap_or(0),
            );
        }

        extract_text(parsed, status.as_u16())
    }
}

impl ContentModel for GeminiClient {
    fn generate<'a>(&'a self, model: &'a str, prompt: &'a str) -> GenerateFuture<'a> {
        Box::pin(self.generate_text(model, prompt))
    }
}

/// Pull the generated text out of a parsed response.
///
/// API-level error objects win over candidates; a candidate with no text
/// parts is reported as [`GenerateError::EmptyResponse`].
fn extract_text(parsed: RawGenerateResponse, http_status: u16) -> Result<String, GenerateError> {
    if let Some(err) = parsed.error {
        return Err(GenerateError::Api {
            status: err.code.unwrap_or(http_status),
            message: err.message,
        });
    }

    let candidate = parsed
        .candidates
        .and_then(|c| c.into_iter().next())
        .ok_or_else(|| GenerateError::Malformed("response has no candidates".into()))?;

    if let Some(ref reason) = candidate.finish_reason {
        debug!("Finish reason: {reason}");
    }

    let text: String = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.is_empty() {
        Err(GenerateError::EmptyResponse)
    } else {
        Ok(text)
    }
}

/// Truncate a string for display in a one-line notice.
pub fn truncate_for_notice(s: &str, max: usize) -> String {
    let mut out: String = s.chars().take(max).collect();
    if s.chars().count() > max {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RawGenerateResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn request_serialization_camel_case() {
        let req = GenerateRequest {
            contents: vec![Content::user_text("hello")],
            generation_config: Some(GenerationConfig {
                temperature: Some(0.7),
                max_output_tokens: Some(2048),
            }),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 2048);
    }

    #[test]
    fn request_skips_absent_generation_fields() {
        let req = GenerateRequest {
            contents: vec![Content::user_text("hi")],
            generation_config: Some(GenerationConfig {
                temperature: None,
                max_output_tokens: None,
            }),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json["generationConfig"].get("temperature").is_none());
        assert!(json["generationConfig"].get("maxOutputTokens").is_none());
    }

    #[test]
    fn extract_text_joins_parts() {
        let parsed = parse(
            r##"{"candidates":[{"content":{"role":"model","parts":[{"text":"# Title\n"},{"text":"body"}]},"finishReason":"STOP"}]}"##,
        );
        assert_eq!(extract_text(parsed, 200).unwrap(), "# Title\nbody");
    }

    #[test]
    fn extract_text_api_error_wins() {
        let parsed = parse(r#"{"error":{"code":429,"message":"quota exceeded"}}"#);
        let err = extract_text(parsed, 429).unwrap_err();
        assert_eq!(
            err,
            GenerateError::Api {
                status: 429,
                message: "quota exceeded".into()
            }
        );
    }

    #[test]
    fn extract_text_no_candidates_is_malformed() {
        let parsed = parse(r#"{}"#);
        assert!(matches!(
            extract_text(parsed, 200),
            Err(GenerateError::Malformed(_))
        ));
    }

    #[test]
    fn extract_text_empty_parts_is_empty_response() {
        let parsed = parse(
            r#"{"candidates":[{"content":{"role":"model","parts":[]},"finishReason":"STOP"}]}"#,
        );
        assert_eq!(
            extract_text(parsed, 200).unwrap_err(),
            GenerateError::EmptyResponse
        );
    }

    #[test]
    fn usage_metadata_parses() {
        let parsed = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"x"}]}}],"usageMetadata":{"promptTokenCount":12,"candidatesTokenCount":345,"totalTokenCount":357}}"#,
        );
        let usage = parsed.usage_metadata.as_ref().unwrap();
        assert_eq!(usage.prompt_token_count, Some(12));
        assert_eq!(usage.total_token_count, Some(357));
        assert_eq!(extract_text(parsed, 200).unwrap(), "x");
    }

    #[test]
    fn error_display_readable() {
        let err = GenerateError::Api {
            status: 403,
            message: "key invalid".into(),
        };
        assert_eq!(err.to_string(), "Gemini API error (HTTP 403): key invalid");
        assert!(GenerateError::MissingKey.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn keyless_client_fails_at_call_time() {
        let client = GeminiClient::new("").unwrap();
        assert!(!client.has_key());
        let err = block_on(client.generate_text(DEFAULT_MODEL, "prompt")).unwrap_err();
        assert_eq!(err, GenerateError::MissingKey);
    }

    #[test]
    fn truncate_for_notice_bounds() {
        assert_eq!(truncate_for_notice("short", 10), "short");
        let long = "a".repeat(300);
        let out = truncate_for_notice(&long, 200);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
    }

    fn block_on<F: Future>(fut: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(fut)
    }
}
