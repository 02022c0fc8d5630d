//! Read-only comparison of sources against the derivatives on disk.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};

use super::discovery::FileDiscovery;
use super::work::{DerivativePlan, OutputLayout, WorkId};

/// Missing derivatives for one work.
#[derive(Debug, Clone, Serialize)]
pub struct WorkAudit {
    pub source: PathBuf,
    pub work_id: WorkId,
    pub missing: Vec<PathBuf>,
}

/// Result of auditing an output tree.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    /// Number of sources examined
    pub sources: usize,
    /// Works with at least one missing derivative
    pub incomplete: Vec<WorkAudit>,
}

impl AuditReport {
    pub fn is_complete(&self) -> bool {
        self.incomplete.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.incomplete.iter().map(|w| w.missing.len()).sum()
    }
}

/// List the expected derivatives that do not exist under `output`.
pub fn audit(config: &Config, input: &Path, output: &Path) -> PipelineResult<AuditReport> {
    let discovery = FileDiscovery::new(config.input.clone());
    let files = discovery.discover(input)?;
    if files.is_empty() {
        return Err(PipelineError::NoInputFiles {
            dir: input.to_path_buf(),
            formats: discovery.describe_formats(),
        });
    }

    let layout = OutputLayout::new(output, &config.output.thumbs_subdir);
    let mut incomplete = Vec::new();
    for file in &files {
        let work = WorkId::from_path(&file.path)?;
        let plan = DerivativePlan::for_work(work, &layout, config);
        let missing: Vec<PathBuf> = plan.missing().into_iter().map(|d| d.path.clone()).collect();
        if !missing.is_empty() {
            incomplete.push(WorkAudit {
                source: file.path.clone(),
                work_id: plan.work,
                missing,
            });
        }
    }

    Ok(AuditReport {
        sources: files.len(),
        incomplete,
    })
}
