//! In-process backend built on the `image` crate.
//!
//! Geometry matches the ffmpeg backend exactly (both use
//! [`crate::pipeline::geometry`]). The `image` WebP encoder is lossless only,
//! so `EncodeJob::quality` is ignored here. Nothing but pixels is written, so
//! outputs never carry source metadata.

use async_trait::async_trait;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::path::Path;

use super::{EncodeJob, Transcoder};
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::geometry::{centre_crop_origin, primary_dimensions, thumbnail_scale};
use crate::pipeline::work::DerivativeKind;

/// Encodes derivatives without any external program.
#[derive(Debug, Default)]
pub struct NativeTranscoder;

impl NativeTranscoder {
    pub fn new() -> Self {
        Self
    }

    /// Apply the derivative geometry to a decoded image.
    pub fn render(image: &DynamicImage, kind: DerivativeKind) -> DynamicImage {
        let (src_w, src_h) = image.dimensions();
        match kind {
            DerivativeKind::Thumbnail(size) => {
                let (w, h) = thumbnail_scale(src_w, src_h, size);
                let scaled = image.resize_exact(w, h, FilterType::Lanczos3);
                let (x, y) = centre_crop_origin(w, h, size);
                scaled.crop_imm(x, y, size, size)
            }
            DerivativeKind::Primary(width) => {
                let (w, h) = primary_dimensions(src_w, src_h, width);
                if (w, h) == (src_w, src_h) {
                    image.clone()
                } else {
                    image.resize_exact(w, h, FilterType::Lanczos3)
                }
            }
        }
    }

    fn encode_sync(job: &EncodeJob) -> PipelineResult<()> {
        let image = decode(&job.source)?;
        let rendered = Self::render(&image, job.kind);

        // The WebP encoder only accepts 8-bit RGB/RGBA.
        let rendered = if rendered.color().has_alpha() {
            DynamicImage::ImageRgba8(rendered.to_rgba8())
        } else {
            DynamicImage::ImageRgb8(rendered.to_rgb8())
        };

        rendered
            .save_with_format(&job.output, ImageFormat::WebP)
            .map_err(|e| PipelineError::Encode {
                path: job.source.clone(),
                output: job.output.clone(),
                message: e.to_string(),
            })
    }
}

fn decode(path: &Path) -> PipelineResult<DynamicImage> {
    let reader = image::ImageReader::open(path)
        .map_err(|e| PipelineError::io(path, e))?
        .with_guessed_format()
        .map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot detect image format: {}", e),
        })?;
    reader.decode().map_err(|e| PipelineError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[async_trait]
impl Transcoder for NativeTranscoder {
    fn name(&self) -> &str {
        "native"
    }

    async fn ensure_available(&self) -> PipelineResult<()> {
        Ok(())
    }

    async fn encode(&self, job: &EncodeJob) -> PipelineResult<()> {
        let owned = job.clone();
        tokio::task::spawn_blocking(move || Self::encode_sync(&owned))
            .await
            .map_err(|e| PipelineError::Encode {
                path: job.source.clone(),
                output: job.output.clone(),
                message: format!("Task join error: {}", e),
            })?
    }
}
