//! Work identifiers, derivative kinds and the output path convention.
//!
//! Catalogue templates reference derivatives purely by path, so the path of
//! every derivative is a function of (work id, kind, size) and nothing else.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};

/// Identifier of a catalogued work, taken from the source file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WorkId(String);

impl WorkId {
    /// Derive the identifier by stripping the extension from the file name.
    pub fn from_path(path: &Path) -> PipelineResult<Self> {
        path.file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .map(|s| WorkId(s.to_string()))
            .ok_or_else(|| PipelineError::InvalidWorkId(path.to_path_buf()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two derivative roles and their pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "role", content = "size", rename_all = "lowercase")]
pub enum DerivativeKind {
    /// Centre-cropped square, `size`×`size`
    #[serde(rename = "thumb")]
    Thumbnail(u32),
    /// Aspect-preserving, width-targeted, never upscaled
    Primary(u32),
}

impl DerivativeKind {
    /// Role tag used in file names.
    pub fn role(&self) -> &'static str {
        match self {
            DerivativeKind::Thumbnail(_) => "thumb",
            DerivativeKind::Primary(_) => "primary",
        }
    }

    pub fn size(&self) -> u32 {
        match self {
            DerivativeKind::Thumbnail(size) | DerivativeKind::Primary(size) => *size,
        }
    }

    /// `<work_id>-<role>-<size>.webp`
    pub fn file_name(&self, work: &WorkId) -> String {
        format!("{}-{}-{}.webp", work, self.role(), self.size())
    }
}

/// Where derivatives land: primaries in `root`, thumbnails in `thumbs`.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub thumbs: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>, thumbs_subdir: &str) -> Self {
        let root = root.into();
        let thumbs = root.join(thumbs_subdir);
        Self { root, thumbs }
    }

    /// Output path for one derivative of one work.
    pub fn path_for(&self, work: &WorkId, kind: DerivativeKind) -> PathBuf {
        let dir = match kind {
            DerivativeKind::Thumbnail(_) => &self.thumbs,
            DerivativeKind::Primary(_) => &self.root,
        };
        dir.join(kind.file_name(work))
    }

    /// Create the output and thumbnail directories if absent.
    pub fn ensure(&self) -> PipelineResult<()> {
        std::fs::create_dir_all(&self.thumbs).map_err(|e| PipelineError::io(&self.thumbs, e))
    }
}

/// One derivative to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedDerivative {
    pub kind: DerivativeKind,
    pub path: PathBuf,
}

/// The ordered derivatives of a single work: thumbnails first, then primaries.
#[derive(Debug, Clone)]
pub struct DerivativePlan {
    pub work: WorkId,
    pub derivatives: Vec<PlannedDerivative>,
}

impl DerivativePlan {
    pub fn for_work(work: WorkId, layout: &OutputLayout, config: &Config) -> Self {
        let kinds = config
            .thumbnail
            .sizes
            .iter()
            .map(|&s| DerivativeKind::Thumbnail(s))
            .chain(
                config
                    .primary
                    .widths
                    .iter()
                    .map(|&w| DerivativeKind::Primary(w)),
            );
        let derivatives = kinds
            .map(|kind| PlannedDerivative {
                kind,
                path: layout.path_for(&work, kind),
            })
            .collect();
        Self { work, derivatives }
    }

    /// Planned derivatives whose output file does not exist yet.
    pub fn missing(&self) -> Vec<&PlannedDerivative> {
        self.derivatives
            .iter()
            .filter(|d| !d.path.is_file())
            .collect()
    }
}
