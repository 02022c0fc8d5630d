//! The `plate check` command: find works with missing derivatives.

use clap::Args;
use plate_core::pipeline::audit;
use plate_core::Config;
use std::path::PathBuf;

/// Arguments for the `check` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Directory containing source images [default: config input.dir]
    pub input: Option<PathBuf>,

    /// Output directory to inspect [default: config output.dir]
    pub output: Option<PathBuf>,

    /// Print the report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Execute the check command.
pub fn execute(args: CheckArgs, config: &Config) -> anyhow::Result<()> {
    let input = args.input.unwrap_or_else(|| config.input_dir());
    let output = args.output.unwrap_or_else(|| config.output_dir());

    let report = audit(config, &input, &output)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for work in &report.incomplete {
            println!("{} ({})", work.work_id, work.source.display());
            for path in &work.missing {
                println!("  missing {}", path.display());
            }
        }
    }

    if !report.is_complete() {
        anyhow::bail!(
            "{} derivative(s) missing across {} of {} work(s); run `plate` to regenerate",
            report.missing_count(),
            report.incomplete.len(),
            report.sources
        );
    }
    tracing::info!("All {} work(s) have a complete set of derivatives", report.sources);
    Ok(())
}
