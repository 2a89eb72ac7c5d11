//! Generate one blog post from a topic and print the Markdown to stdout.
//!
//! Reads the API key from the `GOOGLE_API_KEY` environment variable
//! (a `.env` file is honored). For the interactive chat surface, use the
//! `blogforge-chat` binary from the `blogforge-tui` crate.
//!
//! # Examples
//!
//! ```sh
//! # Basic generation
//! blogforge --topic "renewable energy in rural areas"
//!
//! # Pipe the topic from stdin and pick a model
//! echo "IoT in education" | blogforge --stdin --model gemini-2.5-pro
//!
//! # Inspect the prompt that would be sent, without calling the API
//! blogforge --topic "urban beekeeping" --show-prompt
//! ```

use blogforge::{AppConfig, GeminiClient, config, prompt};
use clap::Parser;
use std::io::{self, Read};
use std::process;

/// Generate one blog post from a topic and print the Markdown to stdout.
///
/// Reads the API key from the GOOGLE_API_KEY environment variable.
#[derive(Parser)]
#[command(name = "blogforge")]
struct Cli {
    /// Topic to write about
    #[arg(long)]
    topic: Option<String>,

    /// Read the topic from stdin
    #[arg(long)]
    stdin: bool,

    /// Model to use
    #[arg(long, default_value = blogforge::DEFAULT_MODEL)]
    model: String,

    /// Sampling temperature (0.0 = deterministic)
    #[arg(long, default_value_t = 0.7)]
    temperature: f32,

    /// Maximum tokens in the generated post
    #[arg(long, default_value_t = 4096)]
    max_output_tokens: u32,

    /// Print the built prompt instead of calling the API
    #[arg(long)]
    show_prompt: bool,
}

fn read_stdin_topic() -> Result<String, String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| format!("failed to read stdin: {e}"))?;
    Ok(buf)
}

fn resolve_topic(cli: &Cli) -> Result<String, String> {
    let raw = match (&cli.topic, cli.stdin) {
        (Some(topic), false) => topic.clone(),
        (None, true) => read_stdin_topic()?,
        (Some(_), true) => return Err("provide --topic or --stdin, not both".to_string()),
        (None, false) => return Err("provide --topic or --stdin".to_string()),
    };

    let topic = raw.trim().to_string();
    if topic.is_empty() {
        return Err("topic is empty".to_string());
    }
    Ok(topic)
}

async fn run(cli: &Cli) -> Result<String, String> {
    let topic = resolve_topic(cli)?;
    let built = prompt::content_prompt(&topic);

    if cli.show_prompt {
        return Ok(built);
    }

    let config = AppConfig::default()
        .with_model(&cli.model)
        .with_temperature(cli.temperature)
        .with_max_output_tokens(cli.max_output_tokens);

    let client = GeminiClient::new(config::api_key_from_env())?
        .with_generation_config(config.generation_config());

    client
        .generate_text(&config.model, &built)
        .await
        .map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
