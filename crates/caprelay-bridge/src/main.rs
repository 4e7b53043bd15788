//! caprelay-bridge — let a language model answer with capability calls.

use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;

use caprelay::ClientSession;
use caprelay_bridge::genai::{GenAiClient, DEFAULT_MODEL};
use caprelay_bridge::runner::{Bridge, BridgeOutcome, DEFAULT_TURN_LIMIT};

/// Environment variable holding the model API credential.
const ENV_API_KEY: &str = "GENAI_API_KEY";

#[derive(Parser)]
#[command(
    name = "caprelay-bridge",
    about = "Drive a caprelay capability server from a language model's function calls",
    version
)]
struct Cli {
    /// Natural-language request for the model.
    message: String,

    /// Capability server base URL.
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    server: String,

    /// Model identifier.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum model turns before giving up.
    #[arg(long, default_value_t = DEFAULT_TURN_LIMIT)]
    turns: usize,

    /// Overall deadline in seconds.
    #[arg(long)]
    deadline_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let api_key = std::env::var(ENV_API_KEY)
        .with_context(|| format!("{ENV_API_KEY} must be set to a model API credential"))?;

    let mut session = ClientSession::connect(&cli.server).await?;
    tracing::info!(
        server = %session.server_info().name,
        session = %session.session_id(),
        "connected"
    );

    let model = GenAiClient::new(api_key).with_model(cli.model);
    let bridge = Bridge::new(model).with_turn_limit(cli.turns);
    let deadline = cli
        .deadline_secs
        .map(|secs| Instant::now() + Duration::from_secs(secs));

    match bridge.run(&mut session, &cli.message, deadline).await? {
        BridgeOutcome::Final { text, turns } => {
            tracing::info!(turns, "model settled on a final answer");
            println!("{text}");
            Ok(())
        }
        BridgeOutcome::TurnLimit { turns } => {
            anyhow::bail!("no final answer within {turns} turns")
        }
    }
}
