//! Plate Core - web derivatives for a catalogue of photographed works.
//!
//! Given a directory of source photographs, plate produces a fixed set of
//! WebP derivatives per work: centre-cropped square thumbnails and
//! width-targeted primaries that are never upscaled. Output paths depend only
//! on the work identifier, the derivative role and its size, which is the
//! whole contract with the site templates.
//!
//! # Architecture
//!
//! ```text
//! Scan → (HEIC/HEIF → JPEG intermediate) → Transcoder ×6 → <out>/…webp
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use plate_core::{Config, DerivativeGenerator, RunOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let output = config.output_dir();
//!     let generator = DerivativeGenerator::from_config(config).await;
//!
//!     let summary = generator
//!         .run("./photos".as_ref(), &output, &RunOptions::default())
//!         .await?;
//!     println!("{} works generated", summary.generated);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod pipeline;
pub mod transcode;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, PipelineError, PipelineResult};
pub use pipeline::{DerivativeGenerator, DerivativeKind, OutputLayout, RunOptions, WorkId};
pub use transcode::{EncodeJob, HeifConverter, Transcoder};
pub use types::{FileOutcome, FileReport, RunSummary};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
