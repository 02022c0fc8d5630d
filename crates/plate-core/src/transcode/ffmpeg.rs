//! ffmpeg backend: one process per derivative, libwebp output.

use async_trait::async_trait;
use std::ffi::OsString;
use std::process::Stdio;
use tokio::process::Command;

use super::{probe, EncodeJob, Transcoder};
use crate::config::EncoderConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::geometry::{primary_filter, thumbnail_filter};
use crate::pipeline::work::DerivativeKind;

/// Encodes derivatives by invoking ffmpeg.
pub struct FfmpegTranscoder {
    config: EncoderConfig,
}

impl FfmpegTranscoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Full argument list for one job.
    ///
    /// `-map_metadata -1` drops EXIF/XMP and other container metadata so no
    /// camera or location data leaks into published derivatives.
    pub fn args(&self, job: &EncodeJob) -> Vec<OsString> {
        let filter = match job.kind {
            DerivativeKind::Thumbnail(size) => thumbnail_filter(size),
            DerivativeKind::Primary(width) => primary_filter(width),
        };

        let mut args: Vec<OsString> = ["-y", "-hide_banner", "-loglevel", "error", "-i"]
            .iter()
            .map(OsString::from)
            .collect();
        args.push(job.source.clone().into_os_string());
        for arg in [
            "-map_metadata".to_string(),
            "-1".to_string(),
            "-vf".to_string(),
            filter,
            "-frames:v".to_string(),
            "1".to_string(),
            "-c:v".to_string(),
            "libwebp".to_string(),
            "-preset".to_string(),
            self.config.preset.clone(),
            "-q:v".to_string(),
            job.quality.to_string(),
            "-compression_level".to_string(),
            self.config.compression_level.to_string(),
        ] {
            args.push(arg.into());
        }
        args.push(job.output.clone().into_os_string());
        args
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn ensure_available(&self) -> PipelineResult<()> {
        probe::check(&self.config.program, &["-version"])
            .await
            .map_err(|e| PipelineError::EncoderMissing {
                program: self.config.program.clone(),
                message: e.to_string(),
            })
    }

    async fn encode(&self, job: &EncodeJob) -> PipelineResult<()> {
        let args = self.args(job);
        tracing::trace!("{} {:?}", self.config.program, args);

        let output = Command::new(&self.config.program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| PipelineError::Spawn {
                program: self.config.program.clone(),
                path: job.source.clone(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => format!("exited with {}", output.status),
                text => text.to_string(),
            };
            return Err(PipelineError::Encode {
                path: job.source.clone(),
                output: job.output.clone(),
                message,
            });
        }
        Ok(())
    }
}
