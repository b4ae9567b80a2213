use crate::commands;
use crate::config::AppConfig;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "log4j-to-slf4j",
    version,
    about = "Convert log4j style log statements to slf4j style statements"
)]
struct Cli {
    /// Increase verbosity (-v, -vv). Uses RUST_LOG under the hood
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Debug mode, same as -v. Writes tons of debug logs
    #[arg(long, global = true)]
    debug: bool,

    /// Path to a config file (defaults to ./log4j-to-slf4j.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rewrite files in place, keeping each original with a backup suffix
    Convert {
        /// Files, directories or glob patterns
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Report what convert would change without writing anything
    Check {
        /// Files, directories or glob patterns
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove backups left by convert
    Clean {
        /// Files, directories or glob patterns
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Delete without confirmation
        #[arg(long)]
        yes: bool,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

pub fn run_cli() -> Result<()> {
    run_cli_with(std::env::args())
}

pub fn run_cli_with<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let cli = Cli::parse_from(args.into_iter().map(Into::<String>::into));
    let verbosity = if cli.debug { cli.verbose.max(1) } else { cli.verbose };
    init_tracing(verbosity);

    let cfg = AppConfig::load(cli.config.as_deref()).context("failed to load config")?;
    match cli.command {
        Commands::Convert { paths } => commands::convert(&cfg, &paths)?,
        Commands::Check { paths, json } => commands::check(&cfg, &paths, json)?,
        Commands::Clean { paths, yes } => {
            let removed = commands::clean(&cfg, &paths, yes)?;
            tracing::info!("removed {} backups", removed);
        }
    }
    Ok(())
}
