//! GameNerd — sports chat backend.
//!
//! Usage:
//!   gamenerd serve               Start the HTTP server
//!   gamenerd ask <query>         Run one single-call query and print the envelope
//!   gamenerd stream <query>      Stream one answer to stdout
//!   gamenerd init-config         Write a default gamenerd.toml

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use futures::StreamExt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use gamenerd::agent::Fragment;
use gamenerd::config::{self, GameNerdConfig};
use gamenerd::inference::{CompletionBackend, OpenAiClient};
use gamenerd::server::{self, AppState};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "gamenerd")]
#[command(version)]
#[command(about = "Sports chat backend relaying queries to an OpenAI-compatible model")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the TOML config file.
    #[arg(long, default_value = "gamenerd.toml")]
    config: String,

    /// Log level (debug, info, warn, error). Overrides the config file.
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server.
    Serve,

    /// Answer one query with the single-call handler and print the envelope.
    Ask {
        query: String,

        /// Send the query without the tool catalog.
        #[arg(long)]
        text_only: bool,
    },

    /// Stream the answer to one query to stdout.
    Stream { query: String },

    /// Write a default config file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = PathBuf::from(shellexpand::tilde(&cli.config).into_owned());
    let cfg = config::load_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    // Initialize logging
    let level = cli.log_level.clone().unwrap_or_else(|| cfg.log_level.clone());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve => cmd_serve(cfg).await,
        Commands::Ask { query, text_only } => cmd_ask(cfg, &query, text_only).await,
        Commands::Stream { query } => cmd_stream(cfg, &query).await,
        Commands::InitConfig { force } => cmd_init_config(&config_path, force),
    }
}

// ---------------------------------------------------------------------------
// Command implementations
// ---------------------------------------------------------------------------

async fn cmd_serve(cfg: GameNerdConfig) -> Result<()> {
    let state = bootstrap(&cfg)?;

    println!(
        "{} GameNerd listening on {} (model: {}, tools: {})",
        ">>>".green().bold(),
        cfg.bind_addr,
        cfg.model,
        if cfg.tool_catalog_enabled { "on" } else { "off" },
    );

    server::serve(&cfg.bind_addr, state, shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn cmd_ask(mut cfg: GameNerdConfig, query: &str, text_only: bool) -> Result<()> {
    let query = non_empty(query)?;
    if text_only {
        cfg.tool_catalog_enabled = false;
    }
    let state = bootstrap(&cfg)?;

    let envelope = state.query.process(query, &[]).await;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

async fn cmd_stream(cfg: GameNerdConfig, query: &str) -> Result<()> {
    let query = non_empty(query)?;
    let state = bootstrap(&cfg)?;

    let mut fragments = state.stream.stream(query);
    let mut stdout = std::io::stdout();
    while let Some(fragment) = fragments.next().await {
        match fragment {
            Fragment::Text(text) => {
                write!(stdout, "{}", text)?;
                stdout.flush()?;
            }
            Fragment::Diagnostic(message) => {
                eprintln!("\n{} {}", "Error:".red().bold(), message);
            }
        }
    }
    println!();
    Ok(())
}

fn cmd_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    config::save_config(&GameNerdConfig::default(), path)?;
    println!("{} Wrote {}", ">>>".green().bold(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read the credential and build the one long-lived upstream client.
fn bootstrap(cfg: &GameNerdConfig) -> Result<AppState> {
    let api_key = config::load_api_key()?;
    let client = OpenAiClient::new(&cfg.api_base_url, &api_key, cfg.timeouts())
        .context("Failed to build inference client")?;
    info!("Inference client initialized for {}", cfg.api_base_url);

    let backend: Arc<dyn CompletionBackend> = Arc::new(client);
    Ok(AppState::new(cfg, backend))
}

fn non_empty(query: &str) -> Result<&str> {
    if query.trim().is_empty() {
        anyhow::bail!("Query cannot be empty");
    }
    Ok(query)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    println!("\n{} Shutting down gracefully...", "<<<".red().bold());
}
