//! Pluggable transcoders: anything that can scale, crop, strip metadata and
//! write WebP.
//!
//! - **ffmpeg**: one external process per derivative, geometry expressed as a
//!   filter graph (the default, and the only backend honouring quality)
//! - **native**: in-process decode/resize/encode with the `image` crate
//! - **heif**: HEIC/HEIF → JPEG intermediates via an external converter
//! - **probe**: availability checks for external programs

pub mod ffmpeg;
pub mod heif;
pub mod native;
pub mod probe;

pub use ffmpeg::FfmpegTranscoder;
pub use heif::{ConverterKind, HeifConverter};
pub use native::NativeTranscoder;

use async_trait::async_trait;
use std::path::PathBuf;

use crate::config::{Config, EncoderBackend};
use crate::error::PipelineResult;
use crate::pipeline::work::{DerivativeKind, PlannedDerivative};

/// A single derivative encode: read `source`, write `output`.
#[derive(Debug, Clone)]
pub struct EncodeJob {
    /// Decodable source (the original, or its JPEG intermediate)
    pub source: PathBuf,
    /// Derivative path
    pub output: PathBuf,
    /// Geometry of the derivative
    pub kind: DerivativeKind,
    /// WebP quality (1-100)
    pub quality: u8,
}

impl EncodeJob {
    /// Build a job for a planned derivative, picking quality by role.
    pub fn new(source: impl Into<PathBuf>, planned: &PlannedDerivative, config: &Config) -> Self {
        let quality = match planned.kind {
            DerivativeKind::Thumbnail(_) => config.thumbnail.quality,
            DerivativeKind::Primary(_) => config.primary.quality,
        };
        Self {
            source: source.into(),
            output: planned.path.clone(),
            kind: planned.kind,
            quality,
        }
    }
}

/// Image transcoder seam.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the generator holds a `Box<dyn Transcoder>`).
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Fail if the backend cannot run on this host.
    async fn ensure_available(&self) -> PipelineResult<()>;

    /// Produce one derivative, overwriting any existing output.
    async fn encode(&self, job: &EncodeJob) -> PipelineResult<()>;
}

/// Create the transcoder selected by `encoder.backend`.
pub fn from_config(config: &Config) -> Box<dyn Transcoder> {
    match config.encoder.backend {
        EncoderBackend::Ffmpeg => Box::new(FfmpegTranscoder::new(config.encoder.clone())),
        EncoderBackend::Native => Box::new(NativeTranscoder::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::work::{OutputLayout, WorkId};
    use std::path::Path;

    #[test]
    fn test_job_quality_by_role() {
        let config = Config::default();
        let layout = OutputLayout::new("out", "thumbs");
        let work = WorkId::from_path(Path::new("00361.jpg")).unwrap();

        let thumb = PlannedDerivative {
            kind: DerivativeKind::Thumbnail(96),
            path: layout.path_for(&work, DerivativeKind::Thumbnail(96)),
        };
        let primary = PlannedDerivative {
            kind: DerivativeKind::Primary(800),
            path: layout.path_for(&work, DerivativeKind::Primary(800)),
        };

        assert_eq!(EncodeJob::new("00361.jpg", &thumb, &config).quality, 78);
        assert_eq!(EncodeJob::new("00361.jpg", &primary, &config).quality, 82);
    }

    #[test]
    fn test_from_config_selects_backend() {
        let mut config = Config::default();
        assert_eq!(from_config(&config).name(), "ffmpeg");
        config.encoder.backend = EncoderBackend::Native;
        assert_eq!(from_config(&config).name(), "native");
    }
}
