use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod app;
mod commands;
mod config;
mod errors;
mod output;

use commands::*;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "cerno")]
#[command(about = "Bidirectional knowledge-memory pipeline for project context files")]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Enable verbose (debug-level) logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a project directory for scanning
    Init {
        /// Project directory to watch
        path: PathBuf,
        /// Human-readable project name, defaulting to the directory name
        #[arg(long)]
        name: Option<String>,
    },
    /// Accumulate fragments from a path (or every watched project)
    Scan {
        /// File or directory to scan; every watched project if omitted
        path: Option<PathBuf>,
    },
    /// Resolve retrieved knowledge into a target file
    Resolve {
        /// Target file to inject resolved knowledge into
        path: PathBuf,
        /// Formatter/agent name
        #[arg(long)]
        agent: Option<String>,
        /// Render without writing the file
        #[arg(long)]
        dry_run: bool,
    },
    /// Summarize pipeline state
    Status,
    /// List persisted insights
    Insights {
        /// Maximum rows printed
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// List persisted principles
    Principles {
        /// Maximum rows printed
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Run one reconciliation pass (cluster, dedup, adjust confidence)
    Reconcile,
    /// Run one organisation pass (promote, link, lifecycle)
    Organise,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let config = config::load(cli.config.as_deref())?;
    let app = app::App::build(config).await?;

    let result = match cli.command {
        Commands::Init { path, name } => init::run(&app, &path, name).await,
        Commands::Scan { path } => scan::run(&app, path.as_deref()).await,
        Commands::Resolve { path, agent, dry_run } => resolve::run(&app, &path, agent.as_deref(), dry_run, cli.format).await,
        Commands::Status => status::run(&app, cli.format).await,
        Commands::Insights { limit } => insights::run(&app, limit, cli.format).await,
        Commands::Principles { limit } => principles::run(&app, limit, cli.format).await,
        Commands::Reconcile => reconcile::run(&app, cli.format).await,
        Commands::Organise => organise::run(&app, cli.format).await,
    };

    if let Err(err) = &result {
        errors::report(err);
        std::process::exit(1);
    }
    Ok(())
}
