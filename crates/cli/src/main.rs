//! Chatbox CLI
//!
//! Main entry point for the chatbox command-line tool.
//! Answers questions about stored articles, interactively or over HTTP.

mod commands;
mod server;

use chatbox_core::{config::AppConfig, logging, AppResult};
use clap::{Parser, Subcommand};
use commands::{ArticlesCommand, AskCommand, ChatCommand, ImportCommand, ServeCommand};
use std::path::PathBuf;

/// Chatbox - ask questions about articles
#[derive(Parser, Debug)]
#[command(name = "chatbox")]
#[command(about = "Ask questions about articles", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "CHATBOX_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "CHATBOX_CONFIG")]
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

    /// Answering provider (ollama, gemini, offline)
    #[arg(short, long, global = true, env = "CHATBOX_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "CHATBOX_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available articles
    Articles(ArticlesCommand),

    /// Import articles from a JSON or YAML file
    Import(ImportCommand),

    /// Ask one question about an article
    Ask(AskCommand),

    /// Chat interactively about an article
    Chat(ChatCommand),

    /// Serve the chat API over HTTP
    Serve(ServeCommand),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Articles(_) => "articles",
            Commands::Import(_) => "import",
            Commands::Ask(_) => "ask",
            Commands::Chat(_) => "chat",
            Commands::Serve(_) => "serve",
        }
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Defaults, then config file, then environment
    let config = AppConfig::load_from(cli.workspace.clone(), cli.config.clone())?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Chatbox starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    // Ensure .chatbox directory exists
    config.ensure_chatbox_dir()?;

    let _span = tracing::info_span!("command", name = cli.command.name()).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Articles(cmd) => cmd.execute(&config).await,
        Commands::Import(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Serve(cmd) => cmd.execute(&config).await,
    };

    // Log completion
    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
