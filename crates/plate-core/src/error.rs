//! Error types for the plate derivative pipeline.
//!
//! Errors are split by concern so the CLI can tell environment problems
//! (missing encoder, empty input) apart from per-file failures, and every
//! per-file error names the source it came from.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline errors, from environment checks down to single encoder calls.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The configured encoder cannot be found or started
    #[error("Required encoder '{program}' is not available: {message}")]
    EncoderMissing { program: String, message: String },

    /// Input directory does not exist or is not a directory
    #[error("Input directory not found: {0}")]
    InputNotFound(PathBuf),

    /// Scan finished without a single supported source
    #[error("No supported images found in {dir} (looked for: {formats})")]
    NoInputFiles { dir: PathBuf, formats: String },

    /// File name does not yield a usable work identifier
    #[error("Cannot derive a work identifier from {0}")]
    InvalidWorkId(PathBuf),

    /// HEIC/HEIF source with no converter installed
    #[error("No HEIC/HEIF converter available for {path} (tried: {tried})")]
    NoConverter { path: PathBuf, tried: String },

    /// HEIC/HEIF to JPEG conversion failed
    #[error("Conversion failed for {path} using {converter}: {message}")]
    Convert {
        path: PathBuf,
        converter: String,
        message: String,
    },

    /// An external program could not be started
    #[error("Failed to start {program} for {path}: {source}")]
    Spawn {
        program: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoder ran but did not produce the derivative
    #[error("Encoding {output} from {path} failed: {message}")]
    Encode {
        path: PathBuf,
        output: PathBuf,
        message: String,
    },

    /// Native backend could not decode the source
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Filesystem error tied to a specific path
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Whether the run should log this error and move on to the next file
    /// regardless of the configured failure policy.
    ///
    /// Only a missing HEIC/HEIF converter qualifies: it is an expected
    /// variation of the host, not a defect in the input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PipelineError::NoConverter { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
