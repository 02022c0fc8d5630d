//! Derivative pipeline components.
//!
//! - **discovery**: Find supported sources in the input directory
//! - **work**: Work identifiers and the output path convention
//! - **geometry**: Primary/thumbnail dimensions and filter graphs
//! - **scratch**: Run-scoped temporary directory for HEIF intermediates
//! - **generator**: Orchestrates a full run
//! - **audit**: Report derivatives missing from an output tree

pub mod audit;
pub mod discovery;
pub mod generator;
pub mod geometry;
pub mod scratch;
pub mod work;

// Re-exports for convenient access
pub use audit::{audit, AuditReport, WorkAudit};
pub use discovery::{DiscoveredFile, FileDiscovery, SourceFormat};
pub use generator::{DerivativeGenerator, RunOptions};
pub use scratch::ScratchDir;
pub use work::{DerivativeKind, DerivativePlan, OutputLayout, PlannedDerivative, WorkId};
