//! Interactive chat surface for blog content generation.
//!
//! Reads the API key from the `GOOGLE_API_KEY` environment variable
//! (a `.env` file is honored); a missing key is a warning, not a fatal
//! error — the session runs in a degraded state until the key is
//! provided. The TUI runs on its own OS thread; the session worker runs
//! on the tokio runtime and processes one submitted topic at a time.
//!
//! ```sh
//! blogforge-chat
//! blogforge-chat --model gemini-2.5-pro --temperature 0.4
//! ```

use std::process;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use blogforge::session::{Session, SubmitOutcome};
use blogforge::ui::tracing::UiTracingLayer;
use blogforge::ui::{self, Notice, UiState};
use blogforge::{AppConfig, GeminiClient, config, truncate_for_notice};
use blogforge_tui::{TuiConfig, spawn_tui};
use clap::Parser;
use tracing::info;
use tracing_subscriber::prelude::*;

/// Interactive chat TUI for the blogforge content generator.
///
/// Reads the API key from the GOOGLE_API_KEY environment variable.
#[derive(Parser)]
#[command(name = "blogforge-chat")]
struct Cli {
    /// Model to use
    #[arg(long, default_value = blogforge::DEFAULT_MODEL)]
    model: String,

    /// Sampling temperature (0.0 = deterministic)
    #[arg(long, default_value_t = 0.7)]
    temperature: f32,

    /// Maximum tokens per generated post
    #[arg(long, default_value_t = 4096)]
    max_output_tokens: u32,
}

/// Process submitted topics until the TUI requests quit.
async fn worker_loop(state: &Arc<Mutex<UiState>>, session: &mut Session<'_>) {
    loop {
        if state.lock().map(|s| s.quit_requested).unwrap_or(true) {
            break;
        }

        let Some(topic) = ui::poll_submission(state) else {
            tokio::time::sleep(Duration::from_millis(100)).await;
            continue;
        };

        ui::set_generating(state, true);
        ui::set_notice(state, Notice::info("Generating content with Gemini\u{2026}"));

        let before = session.transcript().len();
        let outcome = session.submit(&topic).await;

        // Mirror the transcript growth into the shared state.
        for entry in &session.transcript().all()[before..] {
            ui::push_entry(state, entry.clone());
        }

        match outcome {
            SubmitOutcome::Generated => {
                ui::set_notice(state, Notice::info("Content generated."));
            }
            SubmitOutcome::EmptyTopic => {
                ui::set_notice(state, Notice::warning("Please enter a topic first."));
            }
            SubmitOutcome::Failed(err) => {
                ui::set_notice(
                    state,
                    Notice::error(truncate_for_notice(&err.to_string(), 160)),
                );
            }
        }

        ui::set_generating(state, false);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let (ui_layer, log_buffer) = UiTracingLayer::new();
    tracing_subscriber::registry().with(ui_layer).init();

    let app_config = AppConfig::default()
        .with_model(&cli.model)
        .with_temperature(cli.temperature)
        .with_max_output_tokens(cli.max_output_tokens);

    // The one fatal startup error: the HTTP client failing to build.
    let client = GeminiClient::new(config::api_key_from_env())?
        .with_generation_config(app_config.generation_config());

    let state = Arc::new(Mutex::new(UiState::default()));
    {
        let mut s = state.lock().map_err(|_| "state lock poisoned".to_string())?;
        s.model = app_config.model.clone();
        if !client.has_key() {
            s.notice = Some(Notice::warning(format!(
                "{} is not set \u{2014} generation will fail until it is provided.",
                blogforge::API_KEY_ENV
            )));
        }
    }

    info!("Starting chat session (model={})", app_config.model);

    let tui = spawn_tui(
        state.clone(),
        TuiConfig {
            log_buffer: Some(log_buffer),
        },
    );

    let mut session = Session::new(&client, app_config);
    worker_loop(&state, &mut session).await;

    if let Ok(mut s) = state.lock() {
        s.running = false;
    }
    tui.join().map_err(|_| "TUI thread panicked".to_string())?;

    info!(
        "Session ended with {} transcript entries",
        session.transcript().len()
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
