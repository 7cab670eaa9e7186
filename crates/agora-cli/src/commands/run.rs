//! Run command - stage a debate and stream it to the terminal
//!
//! Usage:
//! ```bash
//! agora run
//! agora run --topic "Nuclear energy" --model llama3 --model-b mistral
//! agora run --turns 6 --seed 42
//! ```

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::debug;

use agora_core::{AgentPair, AgentProfile, AgentSlot};
use agora_engine::{DebateConfig, DebateController, DebateEvent, DebateStatus, RunOutcome};
use agora_llm::{OllamaClient, StreamingGenerator};

/// Arguments for the run command
#[derive(Args)]
pub struct RunArgs {
    /// Ollama server URL (env: OLLAMA_URL)
    #[arg(long, env = "OLLAMA_URL", default_value = agora_llm::config::DEFAULT_OLLAMA_URL)]
    pub url: String,

    /// Topic of the debate
    #[arg(long, default_value = "Climate change")]
    pub topic: String,

    /// Stage rules injected into every prompt
    #[arg(long, default_value = "Stay on topic and keep your responses short.")]
    pub rules: String,

    /// First agent's name
    #[arg(long, default_value = "Climate Scientist")]
    pub name: String,

    /// First agent's persona
    #[arg(
        long,
        default_value = "You are a knowledgeable climate scientist advocating for immediate action to combat climate change."
    )]
    pub persona: String,

    /// First agent's model (defaults to the first model the server offers)
    #[arg(long)]
    pub model: Option<String>,

    /// Second agent's name
    #[arg(long, default_value = "Conservative Farmer")]
    pub name_b: String,

    /// Second agent's persona
    #[arg(
        long,
        default_value = "You are a conservative farmer skeptical about the impact of human activities on climate change."
    )]
    pub persona_b: String,

    /// Second agent's model (defaults to the first agent's model)
    #[arg(long)]
    pub model_b: Option<String>,

    /// First agent's sampling temperature
    #[arg(long, default_value_t = 1.0)]
    pub temperature: f32,

    /// First agent's top-k sampling
    #[arg(long, default_value_t = 40)]
    pub top_k: u32,

    /// First agent's memory budget in characters
    #[arg(long, default_value_t = 2000)]
    pub memory: usize,

    /// Second agent's sampling temperature (defaults to --temperature)
    #[arg(long)]
    pub temperature_b: Option<f32>,

    /// Second agent's top-k sampling (defaults to --top-k)
    #[arg(long)]
    pub top_k_b: Option<u32>,

    /// Second agent's memory budget in characters (defaults to --memory)
    #[arg(long)]
    pub memory_b: Option<usize>,

    /// Stop after this many completed turns (the engine itself caps at 1000)
    #[arg(long)]
    pub turns: Option<u32>,

    /// Seed for the first-speaker coin flip
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Run the run command
pub async fn run(args: RunArgs) -> Result<()> {
    let client = Arc::new(OllamaClient::with_url(&args.url));

    // resolve models up front, like the original's dropdown defaults
    let model = match &args.model {
        Some(model) => model.clone(),
        None => {
            let models = client
                .list_models()
                .await
                .with_context(|| format!("cannot reach the Ollama server at {}", args.url))?;
            match models.into_iter().next() {
                Some(model) => model,
                None => bail!("no models installed on {}", args.url),
            }
        }
    };
    let model_b = args.model_b.clone().unwrap_or_else(|| model.clone());

    let agents = build_agents(&args, &model, &model_b);
    let first_name = agents.get(AgentSlot::First).name.clone();

    println!("{} {}", "Topic:".bold(), args.topic);
    println!(
        "{} {} {} {}",
        agents.get(AgentSlot::First).name.cyan().bold(),
        format!("({})", model).dimmed(),
        "vs".dimmed(),
        format!(
            "{} {}",
            agents.get(AgentSlot::Second).name.magenta().bold(),
            format!("({})", model_b).dimmed()
        )
    );
    println!("{}", "Ctrl-C stops the debate after the current turn.".dimmed());
    println!();

    let config = DebateConfig::new(&args.topic, &args.rules, agents);
    let controller = match args.seed {
        Some(seed) => DebateController::with_seed(client, config, seed),
        None => DebateController::new(client, config),
    };
    let controller = Arc::new(controller);
    let mut events = controller.subscribe();

    let mut driver = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.run().await })
    };

    let mut renderer = Renderer::new(first_name);
    let mut finished_turns = 0u32;
    let mut stop_requested = false;

    let outcome = loop {
        tokio::select! {
            joined = &mut driver => {
                break joined.context("debate driver panicked")??;
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if let Some(finished) = renderer.render(&event) {
                            if finished {
                                finished_turns += 1;
                                if args.turns.is_some_and(|cap| finished_turns >= cap) {
                                    controller.stop();
                                }
                            }
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "terminal renderer lagged behind the debate");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                if stop_requested {
                    eprintln!("{}", "Aborting.".red().bold());
                    std::process::exit(130);
                }
                stop_requested = true;
                eprintln!("{}", "Stopping after the current turn...".yellow());
                controller.stop();
            }
        }
    };

    // render anything the driver emitted while we were joining it
    while let Ok(event) = events.try_recv() {
        renderer.render(&event);
    }
    renderer.finish();

    match outcome {
        RunOutcome::Stopped => println!("{}", DebateStatus::Stopped.to_string().yellow()),
        RunOutcome::LimitReached => {
            println!("{}", DebateStatus::LimitReached.to_string().yellow())
        }
        RunOutcome::Interrupted => println!("{}", DebateStatus::Reset.to_string().yellow()),
        RunOutcome::AlreadyRunning => {}
    }
    Ok(())
}

/// Build the two agent profiles; the `-b` overrides fall back to the
/// first agent's values, like `--model-b` falls back to `--model`.
fn build_agents(args: &RunArgs, model: &str, model_b: &str) -> AgentPair {
    AgentPair::new(
        AgentProfile::for_slot(AgentSlot::First, &args.name, &args.persona, model)
            .with_temperature(args.temperature)
            .with_top_k(args.top_k)
            .with_memory_size(args.memory),
        AgentProfile::for_slot(AgentSlot::Second, &args.name_b, &args.persona_b, model_b)
            .with_temperature(args.temperature_b.unwrap_or(args.temperature))
            .with_top_k(args.top_k_b.unwrap_or(args.top_k))
            .with_memory_size(args.memory_b.unwrap_or(args.memory)),
    )
}

/// Incremental terminal renderer for snapshot events.
///
/// Tracks how much of the current entry has been printed and emits only
/// the suffix, so fragments appear as they stream.
struct Renderer {
    first_name: String,
    current_index: Option<usize>,
    printed: String,
}

/// What a snapshot implies for the partially printed entry
#[derive(Debug, PartialEq, Eq)]
enum Delta<'a> {
    /// The new content extends what was shown; print the suffix
    Append(&'a str),
    /// Nothing new to show (a final rewrite may trim the entry)
    Keep,
    /// The entry was rewritten wholesale; start the line over
    Restart,
}

fn delta<'a>(printed: &str, content: &'a str) -> Delta<'a> {
    match content.strip_prefix(printed) {
        Some("") => Delta::Keep,
        Some(suffix) => Delta::Append(suffix),
        None if printed.starts_with(content) => Delta::Keep,
        None => Delta::Restart,
    }
}

impl Renderer {
    fn new(first_name: String) -> Self {
        Self {
            first_name,
            current_index: None,
            printed: String::new(),
        }
    }

    fn paint(&self, speaker: &str) -> colored::ColoredString {
        if speaker == self.first_name {
            speaker.cyan().bold()
        } else {
            speaker.magenta().bold()
        }
    }

    /// Render one event; `Some(true)` marks a completed turn.
    fn render(&mut self, event: &DebateEvent) -> Option<bool> {
        use std::io::Write;

        match event {
            DebateEvent::Snapshot {
                index,
                speaker,
                content,
            } => {
                if self.current_index != Some(*index) {
                    self.finish();
                    self.current_index = Some(*index);
                    print!("{}: ", self.paint(speaker));
                }
                match delta(&self.printed, content) {
                    Delta::Append(suffix) => {
                        print!("{}", suffix);
                        self.printed.push_str(suffix);
                    }
                    Delta::Keep => {}
                    // the error sentinel replaces the partial text
                    Delta::Restart => {
                        println!();
                        print!("{}: {}", self.paint(speaker), content);
                        self.printed = content.clone();
                    }
                }
                let _ = std::io::stdout().flush();
                Some(false)
            }
            DebateEvent::Status(DebateStatus::Finished { .. }) => Some(true),
            DebateEvent::Status(DebateStatus::Errored { agent }) => {
                self.finish();
                eprintln!(
                    "{}",
                    DebateStatus::Errored {
                        agent: agent.clone()
                    }
                    .to_string()
                    .red()
                );
                Some(true)
            }
            DebateEvent::Status(_) => None,
        }
    }

    /// Terminate the current streamed line, if any
    fn finish(&mut self) {
        if self.current_index.is_some() {
            println!();
            println!();
            self.current_index = None;
            self.printed.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: RunArgs,
    }

    #[test]
    fn test_per_agent_flags_fall_back_to_shared_values() {
        let harness = Harness::parse_from(["agora", "--temperature", "0.7"]);
        let agents = build_agents(&harness.args, "llama3", "llama3");
        assert_eq!(agents.get(AgentSlot::First).temperature, 0.7);
        assert_eq!(agents.get(AgentSlot::Second).temperature, 0.7);
        assert_eq!(agents.get(AgentSlot::Second).top_k, 40);
        assert_eq!(agents.get(AgentSlot::Second).memory_size, 2000);
    }

    #[test]
    fn test_second_agent_is_configured_independently() {
        let harness = Harness::parse_from([
            "agora",
            "--temperature",
            "0.7",
            "--temperature-b",
            "1.2",
            "--top-k-b",
            "80",
            "--memory-b",
            "500",
        ]);
        let agents = build_agents(&harness.args, "llama3", "mistral");
        let first = agents.get(AgentSlot::First);
        let second = agents.get(AgentSlot::Second);
        assert_eq!(first.temperature, 0.7);
        assert_eq!(second.temperature, 1.2);
        assert_eq!(second.top_k, 80);
        assert_eq!(second.memory_size, 500);
        assert_eq!(second.model, "mistral");
    }

    #[test]
    fn test_delta_appends_streamed_suffixes() {
        assert_eq!(delta("", "Hel"), Delta::Append("Hel"));
        assert_eq!(delta("Hel", "Hello"), Delta::Append("lo"));
        assert_eq!(delta("Hello", "Hello"), Delta::Keep);
    }

    #[test]
    fn test_delta_keeps_on_final_trim() {
        assert_eq!(delta("spaced  ", "spaced"), Delta::Keep);
    }

    #[test]
    fn test_delta_restarts_when_the_entry_is_rewritten() {
        assert_eq!(delta("partial tex", "Error generating response."), Delta::Restart);
    }
}
