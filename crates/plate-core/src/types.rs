//! Run results reported back to the caller.

use serde::Serialize;
use std::path::PathBuf;

use crate::pipeline::work::{PlannedDerivative, WorkId};

/// What happened to one source file.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    /// All derivatives written (or, in a dry run, planned)
    Generated {
        work_id: WorkId,
        derivatives: Vec<PlannedDerivative>,
    },
    /// Left alone because of an expected environment gap
    Skipped { reason: String },
    /// An encoder or converter error, recorded under the continue policy
    Failed { error: String },
}

/// Per-file entry in a [`RunSummary`].
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub source: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Summary of a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Directory that was scanned
    pub input_dir: PathBuf,
    /// Where primaries were written
    pub primaries_dir: PathBuf,
    /// Where thumbnails were written
    pub thumbnails_dir: PathBuf,
    /// Transcoder backend name
    pub backend: String,
    /// Nothing was encoded or written
    pub dry_run: bool,
    pub generated: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Wall-clock duration of the run
    pub elapsed_ms: u64,
    pub files: Vec<FileReport>,
}

impl RunSummary {
    pub fn new(
        input_dir: PathBuf,
        primaries_dir: PathBuf,
        thumbnails_dir: PathBuf,
        backend: impl Into<String>,
        dry_run: bool,
    ) -> Self {
        Self {
            input_dir,
            primaries_dir,
            thumbnails_dir,
            backend: backend.into(),
            dry_run,
            generated: 0,
            skipped: 0,
            failed: 0,
            elapsed_ms: 0,
            files: Vec::new(),
        }
    }

    /// Record one file's outcome and update the counters.
    pub fn record(&mut self, source: PathBuf, outcome: FileOutcome) {
        match &outcome {
            FileOutcome::Generated { .. } => self.generated += 1,
            FileOutcome::Skipped { .. } => self.skipped += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
        }
        self.files.push(FileReport { source, outcome });
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
