//! Generator setup: CLI overrides on top of the loaded config.

use plate_core::config::FailurePolicy;
use plate_core::{Config, DerivativeGenerator};
use std::path::PathBuf;

use super::GenerateArgs;

/// Everything a run needs, resolved from args and config.
pub struct GenerateContext {
    pub generator: DerivativeGenerator,
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Apply CLI overrides to the config.
pub fn apply_overrides(args: &GenerateArgs, config: &mut Config) {
    if let Some(backend) = args.backend {
        config.encoder.backend = backend.into();
    }
    if let Some(program) = &args.ffmpeg {
        config.encoder.program = program.clone();
    }
    if args.keep_going {
        config.processing.on_error = FailurePolicy::Continue;
    }
}

/// Resolve directories, detect converters and build the generator.
pub async fn setup_generator(
    args: &GenerateArgs,
    mut config: Config,
) -> anyhow::Result<GenerateContext> {
    apply_overrides(args, &mut config);

    let input = args.input.clone().unwrap_or_else(|| config.input_dir());
    let output = args.output.clone().unwrap_or_else(|| config.output_dir());

    if !input.is_dir() {
        anyhow::bail!(
            "Input directory does not exist: {:?}\n\n  Hint: Check the path and try again.",
            input
        );
    }

    let generator = DerivativeGenerator::from_config(config).await;
    match generator.converter() {
        Some(converter) => tracing::debug!("HEIC/HEIF converter: {}", converter.program()),
        None => tracing::debug!(
            "No HEIC/HEIF converter found (tried: {}); HEIC/HEIF sources will be skipped",
            generator.config().heif.converters.join(", ")
        ),
    }

    Ok(GenerateContext {
        generator,
        input,
        output,
    })
}
