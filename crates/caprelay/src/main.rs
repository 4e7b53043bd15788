//! caprelay server — entry point.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use caprelay::config::ServerConfig;
use caprelay::dispatch::Dispatcher;
use caprelay::sample;
use caprelay::transport::HttpTransport;
use caprelay::types::{PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION};

#[derive(Parser)]
#[command(
    name = "caprelay",
    about = "Capability relay server — actions, resources, and prompt templates over HTTP",
    version
)]
struct Cli {
    /// Listen address, e.g. 127.0.0.1:8000.
    #[arg(short, long)]
    listen: Option<String>,

    /// Configuration file path.
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the sample catalog over HTTP (default).
    Serve {
        /// Listen address, e.g. 127.0.0.1:8000.
        #[arg(short, long)]
        listen: Option<String>,

        /// Configuration file path.
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Print the registered capabilities as JSON.
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve {
        listen: None,
        config: None,
    }) {
        Commands::Serve { listen, config } => {
            let config_path = config.or(cli.config);
            let settings = ServerConfig::load(config_path.as_deref())?;
            let listen = listen.or(cli.listen).unwrap_or(settings.listen);

            let registry = sample::sample_registry()?;
            tracing::info!(
                actions = registry.counts().actions,
                resources = registry.counts().resources,
                prompts = registry.counts().prompts,
                "sample catalog registered"
            );
            let dispatcher = Dispatcher::new(Arc::new(registry));
            HttpTransport::new(dispatcher).run(&listen).await?;
        }

        Commands::Info => {
            let registry = sample::sample_registry()?;
            let info = serde_json::json!({
                "server": { "name": SERVER_NAME, "version": SERVER_VERSION },
                "protocol_version": PROTOCOL_VERSION,
                "actions": registry.actions().map(|a| a.name.as_str()).collect::<Vec<_>>(),
                "resources": registry.resources().map(|r| r.uri_template.as_str()).collect::<Vec<_>>(),
                "prompts": registry.prompts().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }

    Ok(())
}
