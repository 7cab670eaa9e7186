//! Models command - list models served by the generation service
//!
//! Usage:
//! ```bash
//! agora models
//! agora models --url http://10.0.0.2:11434
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Table};

use agora_llm::{OllamaClient, StreamingGenerator};

/// Arguments for the models command
#[derive(Args)]
pub struct ModelsArgs {
    /// Ollama server URL (env: OLLAMA_URL)
    #[arg(long, env = "OLLAMA_URL", default_value = agora_llm::config::DEFAULT_OLLAMA_URL)]
    pub url: String,
}

/// Run the models command
pub async fn run(args: ModelsArgs) -> Result<()> {
    let client = OllamaClient::with_url(&args.url);
    let models = client
        .list_models()
        .await
        .with_context(|| format!("cannot reach the Ollama server at {}", args.url))?;

    if models.is_empty() {
        println!("{} no models installed on {}", "ℹ".blue().bold(), args.url);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![Cell::new("Model")]);
    for model in &models {
        table.add_row(vec![Cell::new(model)]);
    }
    println!("{table}");
    println!("{} model(s) on {}", models.len(), args.url.dimmed());
    Ok(())
}
