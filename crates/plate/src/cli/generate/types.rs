//! CLI enum types for the generate command.

use clap::ValueEnum;
use plate_core::config::EncoderBackend;

/// Transcoder backend selectable on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Backend {
    /// External ffmpeg (libwebp, honours quality settings)
    Ffmpeg,
    /// Built-in encoder, no external programs (lossless WebP)
    Native,
}

impl From<Backend> for EncoderBackend {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Ffmpeg => EncoderBackend::Ffmpeg,
            Backend::Native => EncoderBackend::Native,
        }
    }
}
