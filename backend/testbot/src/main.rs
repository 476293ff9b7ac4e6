mod extension;
mod fixtures;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use slashforge_commands::{
    AutocompleteInteraction, CommandDispatcher, CommandInteraction, CommandRegistry,
    DispatchSettings,
};
use slashforge_config::{config_dir, config_file_path, load_and_prepare, ForgeConfig};

#[derive(Parser)]
#[command(name = "slashforge-testbot")]
#[command(about = "Run slash-command payloads through the argument pipeline")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.slashforge/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered commands and their options
    List,
    /// Execute a command interaction payload
    Invoke {
        /// JSON file holding a command interaction
        payload: PathBuf,
    },
    /// Resolve autocomplete suggestions for a payload
    Complete {
        /// JSON file holding an autocomplete interaction
        payload: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_file_path(&config_dir()));
    let config = load_and_prepare(&path).await?;
    let _log_guard = slashforge_logging::init_logger(&config.logging())?;

    let dispatcher = build_dispatcher(&config)?;

    match cli.command {
        Commands::List => {
            let summaries = dispatcher.registry().summaries();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        Commands::Invoke { payload } => {
            let mut interaction: CommandInteraction = read_payload(&payload).await?;
            if interaction.context.guild_id.is_none() {
                interaction.context.guild_id = config.fixtures().guild_id;
            }
            let response = dispatcher.dispatch_command(&interaction).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Complete { payload } => {
            let mut interaction: AutocompleteInteraction = read_payload(&payload).await?;
            if interaction.context.guild_id.is_none() {
                interaction.context.guild_id = config.fixtures().guild_id;
            }
            let suggestions = dispatcher.dispatch_autocomplete(&interaction).await?;
            println!("{}", serde_json::to_string_pretty(&suggestions)?);
        }
    }

    Ok(())
}

fn build_dispatcher(config: &ForgeConfig) -> Result<CommandDispatcher> {
    let mut registry = CommandRegistry::new();
    extension::register(&mut registry).context("Failed to register test commands")?;

    let lookup = fixtures::lookup_from(&config.fixtures());
    let interactions = config.interactions();
    let settings = DispatchSettings {
        suggestion_cap: interactions
            .suggestion_cap
            .unwrap_or(slashforge_commands::MAX_SUGGESTIONS),
        command_deadline: Duration::from_millis(
            interactions
                .command_deadline_ms
                .unwrap_or(slashforge_config::defaults::DEFAULT_COMMAND_DEADLINE_MS),
        ),
        autocomplete_deadline: Duration::from_millis(
            interactions
                .autocomplete_deadline_ms
                .unwrap_or(slashforge_config::defaults::DEFAULT_AUTOCOMPLETE_DEADLINE_MS),
        ),
    };

    info!(
        commands = registry.len(),
        suggestion_cap = settings.suggestion_cap,
        "Test bot ready"
    );
    Ok(CommandDispatcher::new(registry, Arc::new(lookup), settings))
}

async fn read_payload<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read payload: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid interaction payload: {}", path.display()))
}
