//! Plate CLI - web derivatives for a catalogue of photographed works.
//!
//! Converts every supported photograph in a directory into two square
//! thumbnails and four width-targeted primaries, all WebP, at paths the site
//! templates can compute from the work identifier alone.
//!
//! # Usage
//!
//! ```bash
//! # Current directory into assets/img/works
//! plate
//!
//! # Explicit input and output directories
//! plate ~/scans/2024 assets/img/works
//!
//! # Preview paths without encoding
//! plate ~/scans/2024 --dry-run
//!
//! # Report works with missing derivatives
//! plate check ~/scans/2024
//!
//! # View configuration
//! plate config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// Plate - batch-convert catalogue photographs into web-optimized WebP derivatives.
#[derive(Parser, Debug)]
#[command(name = "plate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "PLATE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    generate: cli::generate::GenerateArgs,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate derivatives (the default when no command is given)
    Generate(cli::generate::GenerateArgs),

    /// List works whose derivatives are missing from the output directory
    Check(cli::check::CheckArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config_path = cli
        .config
        .as_ref()
        .map(|p| PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).into_owned()));
    let config = match &config_path {
        Some(path) => plate_core::Config::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => match plate_core::Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `plate config path`."
                );
                plate_core::Config::default()
            }
        },
    };
    logging::init_from_config(&config.logging, cli.verbose, cli.json_logs);

    tracing::debug!("Plate v{}", plate_core::VERSION);

    let config_path = config_path.unwrap_or_else(plate_core::Config::default_path);

    match cli.command {
        Some(Commands::Generate(args)) => cli::generate::execute(args, config).await,
        Some(Commands::Check(args)) => cli::check::execute(args, &config),
        Some(Commands::Config(args)) => cli::config::execute(args, &config, &config_path),
        None => cli::generate::execute(cli.generate, config).await,
    }
}
