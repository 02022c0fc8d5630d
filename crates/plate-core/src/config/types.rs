//! Configuration section types with their documented defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory scanned for sources when none is given on the command line
    pub dir: PathBuf,

    /// Supported source extensions, matched case-insensitively
    pub supported_formats: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            supported_formats: ["jpg", "jpeg", "heic", "heif", "png", "tif", "tiff"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Output layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives primaries (relative to the working directory)
    pub dir: PathBuf,

    /// Subdirectory of `dir` that receives thumbnails
    pub thumbs_subdir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets/img/works"),
            thumbs_subdir: "thumbs".to_string(),
        }
    }
}

/// Primary (width-targeted) derivative settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimaryConfig {
    /// Target widths in pixels; sources narrower than a width are not upscaled
    pub widths: Vec<u32>,

    /// WebP quality (1-100)
    pub quality: u8,
}

impl Default for PrimaryConfig {
    fn default() -> Self {
        Self {
            widths: vec![800, 1200, 1600, 2400],
            quality: 82,
        }
    }
}

/// Square thumbnail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Edge lengths of the centre-cropped squares
    pub sizes: Vec<u32>,

    /// WebP quality (1-100)
    pub quality: u8,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            sizes: vec![96, 192],
            quality: 78,
        }
    }
}

/// Which transcoder implementation drives the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncoderBackend {
    /// External ffmpeg process per derivative
    #[default]
    Ffmpeg,
    /// In-process decode/resize/encode via the `image` crate
    Native,
}

impl std::fmt::Display for EncoderBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncoderBackend::Ffmpeg => write!(f, "ffmpeg"),
            EncoderBackend::Native => write!(f, "native"),
        }
    }
}

/// Encoder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Transcoder implementation
    pub backend: EncoderBackend,

    /// Program name or path for the ffmpeg backend
    pub program: String,

    /// libwebp preset ("photo", "picture", "drawing", ...)
    pub preset: String,

    /// libwebp compression effort (0 = fastest, 6 = smallest)
    pub compression_level: u8,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            backend: EncoderBackend::Ffmpeg,
            program: "ffmpeg".to_string(),
            preset: "photo".to_string(),
            compression_level: 6,
        }
    }
}

/// HEIC/HEIF intermediate conversion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeifConfig {
    /// Converter programs in preference order ("heif-convert", "magick")
    pub converters: Vec<String>,

    /// JPEG quality of the intermediate
    pub quality: u8,
}

impl Default for HeifConfig {
    fn default() -> Self {
        Self {
            converters: vec!["heif-convert".to_string(), "magick".to_string()],
            quality: 90,
        }
    }
}

/// What happens when a source fails to encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the run at the first failure
    #[default]
    Abort,
    /// Record the failure and move on to the next source
    Continue,
}

/// Processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Behaviour on per-file encoder or converter failure
    pub on_error: FailurePolicy,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
