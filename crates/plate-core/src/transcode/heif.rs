//! HEIC/HEIF → JPEG intermediates.
//!
//! ffmpeg cannot decode HEIF stills, so these sources go through one of the
//! configured converters first. Converters are tried in preference order and
//! the first one installed is used for the whole run.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::probe;
use crate::config::HeifConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::scratch::ScratchDir;

/// Known converter command-line shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterKind {
    /// libheif's `heif-convert -q <q> <in> <out>`
    HeifConvert,
    /// ImageMagick `magick <in> -quality <q> <out>` (also `convert`)
    Magick,
    /// macOS `sips -s format jpeg -s formatOptions <q> <in> --out <out>`
    Sips,
}

impl ConverterKind {
    /// Recognise a converter by program file name (a full path is allowed).
    pub fn from_program(program: &str) -> Option<Self> {
        let name = Path::new(program).file_stem()?.to_str()?;
        match name {
            "heif-convert" | "heif-dec" => Some(ConverterKind::HeifConvert),
            "magick" | "convert" => Some(ConverterKind::Magick),
            "sips" => Some(ConverterKind::Sips),
            _ => None,
        }
    }

    fn probe_args(&self) -> &'static [&'static str] {
        match self {
            ConverterKind::HeifConvert => &["--version"],
            ConverterKind::Magick => &["-version"],
            ConverterKind::Sips => &["--help"],
        }
    }

    /// Argument list converting `input` to a JPEG at `output`.
    pub fn args(&self, input: &Path, output: &Path, quality: u8) -> Vec<OsString> {
        let q = quality.to_string();
        let input = input.as_os_str().to_owned();
        let output = output.as_os_str().to_owned();
        match self {
            ConverterKind::HeifConvert => vec!["-q".into(), q.into(), input, output],
            ConverterKind::Magick => vec![input, "-quality".into(), q.into(), output],
            ConverterKind::Sips => vec![
                "-s".into(),
                "format".into(),
                "jpeg".into(),
                "-s".into(),
                "formatOptions".into(),
                q.into(),
                input,
                "--out".into(),
                output,
            ],
        }
    }
}

/// The converter selected for a run.
#[derive(Debug, Clone)]
pub struct HeifConverter {
    kind: ConverterKind,
    program: String,
    quality: u8,
}

impl HeifConverter {
    pub fn new(kind: ConverterKind, program: impl Into<String>, quality: u8) -> Self {
        Self {
            kind,
            program: program.into(),
            quality,
        }
    }

    /// Pick the first installed converter from `config.converters`.
    ///
    /// Returns `None` if none is installed; HEIF sources are then skipped.
    pub async fn detect(config: &HeifConfig) -> Option<Self> {
        for program in &config.converters {
            let Some(kind) = ConverterKind::from_program(program) else {
                tracing::warn!("Ignoring unknown HEIF converter '{}'", program);
                continue;
            };
            if probe::is_available(program, kind.probe_args()).await {
                tracing::debug!("Using {} ({:?}) for HEIC/HEIF conversion", program, kind);
                return Some(Self::new(kind, program.clone(), config.quality));
            }
            tracing::debug!("HEIF converter '{}' not found", program);
        }
        None
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Convert `source` to `<stem>.jpg` inside the run's scratch directory.
    pub async fn convert(
        &self,
        source: &Path,
        scratch: &mut ScratchDir,
    ) -> PipelineResult<PathBuf> {
        let stem = source
            .file_stem()
            .ok_or_else(|| PipelineError::InvalidWorkId(source.to_path_buf()))?;
        let mut name = stem.to_os_string();
        name.push(".jpg");
        let output = scratch.get_or_create()?.join(name);

        let args = self.kind.args(source, &output, self.quality);
        tracing::trace!("{} {:?}", self.program, args);

        let result = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| PipelineError::Spawn {
                program: self.program.clone(),
                path: source.to_path_buf(),
                source: e,
            })?;

        if !result.status.success() || !output.is_file() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let message = match stderr.trim() {
                "" => format!("exited with {}", result.status),
                text => text.to_string(),
            };
            return Err(PipelineError::Convert {
                path: source.to_path_buf(),
                converter: self.program.clone(),
                message,
            });
        }
        Ok(output)
    }
}
