//! Error handling for entrymap.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod analysis_error;
pub mod parse_error;

pub use analysis_error::AnalysisError;
pub use parse_error::ParseError;
