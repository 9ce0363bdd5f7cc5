//! Grounded CLI
//!
//! Main entry point for the `grounded` command-line tool.
//! Answers requests from a private document corpus, either directly from
//! search results or through a research-then-synthesize workflow.

mod commands;
mod services;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::{AskCommand, CorpusCommand, ResearchCommand, RouteCommand};
use grounded_core::{config::AppConfig, logging};
use std::path::PathBuf;

/// Grounded - corpus-grounded answers and proposals
#[derive(Parser, Debug)]
#[command(name = "grounded")]
#[command(about = "Corpus-grounded answers and research proposals", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "GROUNDED_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "GROUNDED_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// LLM provider (ollama, openai)
    #[arg(short, long, global = true, env = "GROUNDED_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "GROUNDED_MODEL")]
    model: Option<String>,

    /// Search service base URL
    #[arg(long, global = true, env = "GROUNDED_SEARCH_ENDPOINT")]
    search_endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Route a request and answer it
    Ask(AskCommand),

    /// Show how a request would be routed
    Route(RouteCommand),

    /// Run the research-synthesis workflow for a request
    Research(ResearchCommand),

    /// Upload and inspect the document corpus
    Corpus(CorpusCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.provider,
        cli.model,
        cli.search_endpoint,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Grounded CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    config.ensure_grounded_dir()?;

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Route(_) => "route",
        Commands::Research(_) => "research",
        Commands::Corpus(_) => "corpus",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Route(cmd) => cmd.execute(&config).await,
        Commands::Research(cmd) => cmd.execute(&config).await,
        Commands::Corpus(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!(kind = ?e.kind(), "Command failed: {}", e),
    }

    result.with_context(|| format!("grounded {} failed", command_name))
}
