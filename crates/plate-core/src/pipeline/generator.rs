//! Run orchestration: environment check, discovery, conversion, encoding.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::{Config, FailurePolicy};
use crate::error::{PipelineError, PipelineResult};
use crate::transcode::{self, EncodeJob, HeifConverter, Transcoder};
use crate::types::{FileOutcome, RunSummary};

use super::discovery::{DiscoveredFile, FileDiscovery, SourceFormat};
use super::scratch::ScratchDir;
use super::work::{DerivativePlan, OutputLayout, WorkId};

/// Options for a single run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Plan derivatives without running any external program or writing files
    pub dry_run: bool,
}

/// Turns a directory of source photographs into WebP derivatives.
pub struct DerivativeGenerator {
    config: Config,
    transcoder: Box<dyn Transcoder>,
    converter: Option<HeifConverter>,
    discovery: FileDiscovery,
}

impl DerivativeGenerator {
    /// Create a generator from explicit parts.
    pub fn new(
        config: Config,
        transcoder: Box<dyn Transcoder>,
        converter: Option<HeifConverter>,
    ) -> Self {
        let discovery = FileDiscovery::new(config.input.clone());
        Self {
            config,
            transcoder,
            converter,
            discovery,
        }
    }

    /// Create a generator with the configured backend and the first
    /// installed HEIF converter.
    pub async fn from_config(config: Config) -> Self {
        let transcoder = transcode::from_config(&config);
        let converter = HeifConverter::detect(&config.heif).await;
        Self::new(config, transcoder, converter)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn converter(&self) -> Option<&HeifConverter> {
        self.converter.as_ref()
    }

    /// Process every supported source in `input`, writing into `output`.
    ///
    /// Sources are handled one at a time in path order. A HEIC/HEIF source
    /// with no converter is skipped with a warning. Any other per-file error
    /// ends the run under [`FailurePolicy::Abort`], or is recorded under
    /// [`FailurePolicy::Continue`]. Derivatives already written for the
    /// failing source are left in place; the next run overwrites them.
    pub async fn run(
        &self,
        input: &Path,
        output: &Path,
        options: &RunOptions,
    ) -> PipelineResult<RunSummary> {
        let start = Instant::now();

        if !options.dry_run {
            self.transcoder.ensure_available().await?;
        }

        let files = self.discovery.discover(input)?;
        if files.is_empty() {
            return Err(PipelineError::NoInputFiles {
                dir: input.to_path_buf(),
                formats: self.discovery.describe_formats(),
            });
        }
        tracing::info!(
            "Found {} source image(s) in {:?} ({} bytes)",
            files.len(),
            input,
            FileDiscovery::total_size(&files)
        );

        let layout = OutputLayout::new(output, &self.config.output.thumbs_subdir);
        if !options.dry_run {
            layout.ensure()?;
        }

        let mut summary = RunSummary::new(
            input.to_path_buf(),
            layout.root.clone(),
            layout.thumbs.clone(),
            self.transcoder.name(),
            options.dry_run,
        );
        let mut scratch = ScratchDir::new();
        let mut seen: HashMap<WorkId, PathBuf> = HashMap::new();

        for file in &files {
            let outcome = match self
                .process_file(file, &layout, &mut scratch, options)
                .await
            {
                Ok(plan) => {
                    if let Some(previous) = seen.insert(plan.work.clone(), file.path.clone()) {
                        tracing::warn!(
                            "Work id '{}' from {:?} overwrites derivatives of {:?}",
                            plan.work,
                            file.path,
                            previous
                        );
                    }
                    FileOutcome::Generated {
                        work_id: plan.work,
                        derivatives: plan.derivatives,
                    }
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!("Skipping {:?}: {}", file.path, e);
                    FileOutcome::Skipped {
                        reason: e.to_string(),
                    }
                }
                Err(e) => match self.config.processing.on_error {
                    FailurePolicy::Abort => return Err(e),
                    FailurePolicy::Continue => {
                        tracing::error!("Failed: {:?} - {}", file.path, e);
                        FileOutcome::Failed {
                            error: e.to_string(),
                        }
                    }
                },
            };
            summary.record(file.path.clone(), outcome);
        }

        if let Some(dir) = scratch.path() {
            tracing::debug!("Removing scratch directory {:?}", dir);
        }
        scratch.close()?;
        summary.elapsed_ms = start.elapsed().as_millis() as u64;
        Ok(summary)
    }

    /// Produce every derivative of one source.
    async fn process_file(
        &self,
        file: &DiscoveredFile,
        layout: &OutputLayout,
        scratch: &mut ScratchDir,
        options: &RunOptions,
    ) -> PipelineResult<DerivativePlan> {
        let work = WorkId::from_path(&file.path)?;
        let file_name = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::info!("Processing {} → {}", file_name, work);

        let source = match file.format {
            SourceFormat::Direct => file.path.clone(),
            SourceFormat::Heif => match &self.converter {
                None => {
                    return Err(PipelineError::NoConverter {
                        path: file.path.clone(),
                        tried: self.config.heif.converters.join(", "),
                    })
                }
                Some(_) if options.dry_run => file.path.clone(),
                Some(converter) => {
                    tracing::info!("  Converting {} → JPEG ({})", file_name, converter.program());
                    converter.convert(&file.path, scratch).await?
                }
            },
        };

        let plan = DerivativePlan::for_work(work, layout, &self.config);
        for planned in &plan.derivatives {
            if options.dry_run {
                tracing::info!("  Would write {:?}", planned.path);
                continue;
            }
            let encode_start = Instant::now();
            let job = EncodeJob::new(&source, planned, &self.config);
            self.transcoder.encode(&job).await?;
            tracing::debug!("  Wrote {:?} in {:?}", planned.path, encode_start.elapsed());
        }

        Ok(plan)
    }
}
