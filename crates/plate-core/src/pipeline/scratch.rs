//! Run-scoped scratch directory for HEIC/HEIF intermediates.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::error::{PipelineError, PipelineResult};

/// Temporary directory owned by a single run.
///
/// Nothing touches the filesystem until the first conversion asks for it;
/// after that every conversion in the run shares the same directory. The
/// directory and its contents are removed when the value is dropped, which
/// covers normal completion, early error returns and a cancelled run future.
#[derive(Debug, Default)]
pub struct ScratchDir {
    dir: Option<TempDir>,
}

impl ScratchDir {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the scratch directory, creating it on first use.
    pub fn get_or_create(&mut self) -> PipelineResult<&Path> {
        let dir = match self.dir.take() {
            Some(dir) => dir,
            None => {
                let dir = tempfile::Builder::new()
                    .prefix("plate-heif-")
                    .tempdir()
                    .map_err(|e| PipelineError::io(std::env::temp_dir(), e))?;
                tracing::debug!("Created scratch directory {:?}", dir.path());
                dir
            }
        };
        Ok(self.dir.insert(dir).path())
    }

    /// Path of the scratch directory if one has been created.
    pub fn path(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|d| d.path().to_path_buf())
    }

    /// Remove the directory now, reporting any failure instead of ignoring it.
    pub fn close(mut self) -> PipelineResult<()> {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            dir.close().map_err(|e| PipelineError::io(path, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_creation() {
        let scratch = ScratchDir::new();
        assert!(scratch.path().is_none());
    }

    #[test]
    fn test_created_once_and_reused() {
        let mut scratch = ScratchDir::new();
        let first = scratch.get_or_create().unwrap().to_path_buf();
        let second = scratch.get_or_create().unwrap().to_path_buf();
        assert_eq!(first, second);
        assert!(first.is_dir());
    }

    #[test]
    fn test_removed_on_drop() {
        let mut scratch = ScratchDir::new();
        let path = scratch.get_or_create().unwrap().to_path_buf();
        std::fs::write(path.join("intermediate.jpg"), b"x").unwrap();
        drop(scratch);
        assert!(!path.exists());
    }

    #[test]
    fn test_close_removes_directory() {
        let mut scratch = ScratchDir::new();
        let path = scratch.get_or_create().unwrap().to_path_buf();
        scratch.close().unwrap();
        assert!(!path.exists());
    }
}
