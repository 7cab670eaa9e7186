//! Agora CLI - two-agent LLM debates in the terminal
//!
//! # Usage
//!
//! ```bash
//! # Run a debate with the default personas against a local Ollama server
//! agora run
//!
//! # Pick a topic and models
//! agora run --topic "Nuclear energy" --model llama3 --model-b mistral
//!
//! # List the models the server offers
//! agora models
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{models, run};

/// Agora - scripted debates between two local LLM agents
#[derive(Parser)]
#[command(
    name = "agora",
    version,
    about = "Agora CLI - two-agent LLM debates",
    long_about = "Agora stages a debate between two independently configured\n\
                  agents speaking through a local Ollama server, streaming\n\
                  each turn to the terminal as it is generated."
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a debate
    #[command(name = "run")]
    Run(run::RunArgs),

    /// List models served by the generation service
    #[command(name = "models")]
    Models(models::ModelsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match cli.command {
        Commands::Run(args) => run::run(args).await,
        Commands::Models(args) => models::run(args).await,
    }
}

/// Setup logging based on verbosity level
fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();
}
