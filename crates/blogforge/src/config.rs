//! Application configuration.

use crate::{API_KEY_ENV, DEFAULT_MODEL, GenerationConfig};
use tracing::warn;

/// Configuration for a generation session.
///
/// The model identifier is fixed configuration, never user-controlled at
/// submit time.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Gemini model identifier.
    pub model: String,
    /// Sampling temperature passed through to the API.
    pub temperature: f32,
    /// Upper bound on generated tokens per call.
    pub max_output_tokens: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_output_tokens: 4096,
        }
    }
}

impl AppConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// The per-request generation parameters derived from this config.
    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: Some(self.temperature),
            max_output_tokens: Some(self.max_output_tokens),
        }
    }
}

/// Read the API key from the environment (after an optional `.env` load).
///
/// Absence is not fatal: a warning is surfaced to the operator and an
/// empty key is returned, leaving the client in a degraded state where
/// every generation attempt fails downstream.
pub fn api_key_from_env() -> String {
    dotenv::dotenv().ok();
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.is_empty() => key,
        _ => {
            warn!("{API_KEY_ENV} is not set — generation requests will fail until it is provided");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.max_output_tokens > 0);
    }

    #[test]
    fn builder_methods_override() {
        let config = AppConfig::default()
            .with_model("gemini-2.5-pro")
            .with_temperature(0.2)
            .with_max_output_tokens(1024);
        assert_eq!(config.model, "gemini-2.5-pro");
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.max_output_tokens, 1024);
    }

    #[test]
    fn generation_config_carries_values() {
        let generation = AppConfig::default().with_max_output_tokens(512).generation_config();
        assert_eq!(generation.max_output_tokens, Some(512));
        assert!(generation.temperature.is_some());
    }
}
