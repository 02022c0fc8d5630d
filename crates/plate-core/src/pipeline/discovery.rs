//! Source discovery: the supported images directly inside the input directory.

use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::InputConfig;
use crate::error::{PipelineError, PipelineResult};

/// How a source reaches the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Decoded by the encoder as-is (JPEG, PNG, TIFF)
    Direct,
    /// HEIC/HEIF: needs a JPEG intermediate first
    Heif,
}

impl SourceFormat {
    /// Classify by extension, case-insensitively.
    pub fn from_path(path: &Path) -> Self {
        match extension_lower(path).as_deref() {
            Some("heic") | Some("heif") => SourceFormat::Heif,
            _ => SourceFormat::Direct,
        }
    }
}

/// A supported file found in the input directory.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Whether conversion is needed before encoding
    pub format: SourceFormat,
}

/// Discovers source images in a single directory.
pub struct FileDiscovery {
    config: InputConfig,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: InputConfig) -> Self {
        Self { config }
    }

    /// Discover all supported image files directly inside `dir`.
    ///
    /// Subdirectories are not descended into. Results are sorted by path so
    /// runs process sources in the same order every time.
    pub fn discover(&self, dir: &Path) -> PipelineResult<Vec<DiscoveredFile>> {
        if !dir.is_dir() {
            return Err(PipelineError::InputNotFound(dir.to_path_buf()));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Cannot read entry in {:?}: {}", dir, e);
                    continue;
                }
            };
            let entry_path = entry.path();
            if is_hidden(entry_path) {
                tracing::debug!("Ignoring hidden file {:?}", entry_path);
                continue;
            }
            if entry.file_type().is_file() && self.is_supported(entry_path) {
                if let Ok(meta) = entry.metadata() {
                    files.push(DiscoveredFile {
                        path: entry_path.to_path_buf(),
                        size: meta.len(),
                        format: SourceFormat::from_path(entry_path),
                    });
                }
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// Check if a file has a supported extension.
    pub fn is_supported(&self, path: &Path) -> bool {
        extension_lower(path)
            .map(|ext| {
                self.config
                    .supported_formats
                    .iter()
                    .any(|fmt| fmt.to_lowercase() == ext)
            })
            .unwrap_or(false)
    }

    /// Comma-separated list of supported extensions, for messages.
    pub fn describe_formats(&self) -> String {
        self.config.supported_formats.join(", ")
    }

    /// Get total size of all discovered files.
    pub fn total_size(files: &[DiscoveredFile]) -> u64 {
        files.iter().map(|f| f.size).sum()
    }
}

/// Dotfiles, including macOS `._name` AppleDouble companions.
fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}
