//! The generate command: the default `plate [INPUT] [OUTPUT]` invocation.

mod setup;
pub mod types;

pub use types::Backend;

use clap::Args;
use plate_core::{Config, RunOptions, RunSummary};
use std::path::PathBuf;

use setup::setup_generator;

/// Exit status after SIGINT/SIGTERM (128 + SIGINT).
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Arguments for generating derivatives.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Directory containing source images [default: config input.dir, "."]
    pub input: Option<PathBuf>,

    /// Output directory for derivatives [default: config output.dir, "assets/img/works"]
    pub output: Option<PathBuf>,

    /// List the derivatives each source would produce without encoding anything
    #[arg(long)]
    pub dry_run: bool,

    /// Transcoder backend (overrides encoder.backend)
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,

    /// ffmpeg program to run (overrides encoder.program)
    #[arg(long, env = "PLATE_FFMPEG")]
    pub ffmpeg: Option<String>,

    /// Record per-file failures and keep going instead of stopping the run
    #[arg(long)]
    pub keep_going: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Execute a run.
pub async fn execute(args: GenerateArgs, config: Config) -> anyhow::Result<()> {
    let ctx = setup_generator(&args, config).await?;
    let options = RunOptions {
        dry_run: args.dry_run,
    };

    // Dropping the run future on a signal drops its scratch directory (and
    // kills any child process) before we exit.
    let result = tokio::select! {
        result = ctx.generator.run(&ctx.input, &ctx.output, &options) => Some(result),
        _ = shutdown_signal() => None,
    };
    let Some(result) = result else {
        tracing::warn!("Interrupted; temporary files removed");
        std::process::exit(INTERRUPTED_EXIT_CODE);
    };
    let summary = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    report(&summary);

    if summary.has_failures() {
        anyhow::bail!(
            "{} of {} source(s) failed to encode",
            summary.failed,
            summary.files.len()
        );
    }
    Ok(())
}

fn report(summary: &RunSummary) {
    let verb = if summary.dry_run { "Planned" } else { "Generated" };
    tracing::info!(
        "{} {} work(s), skipped {}, failed {} in {:.1}s",
        verb,
        summary.generated,
        summary.skipped,
        summary.failed,
        summary.elapsed_ms as f64 / 1000.0
    );
    tracing::info!("Primaries → {}", summary.primaries_dir.display());
    tracing::info!("Thumbnails → {}", summary.thumbnails_dir.display());
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                tracing::warn!("Could not install signal handlers");
                std::future::pending::<()>().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
