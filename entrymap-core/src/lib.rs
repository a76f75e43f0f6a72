//! Core vocabulary for the entrymap analysis engine.
//!
//! Shared error enums, diagnostics, analysis configuration, cooperative
//! cancellation, collection aliases, and tracing setup. The engine itself
//! lives in `entrymap-analysis`.

pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;

pub use config::AnalysisConfig;
pub use diagnostics::{Diagnostic, Stage};
pub use errors::{AnalysisError, ParseError};
pub use traits::cancellation::{Cancellable, CancellationToken};
