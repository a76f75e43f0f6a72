//! Top-level analysis errors.

/// Fatal conditions for a whole analysis run.
///
/// Per-file and per-declaration failures are diagnostics, not errors; the
/// engine only fails outright when there is nothing to analyze, so callers
/// can tell misconfiguration apart from a legitimately entry-point-free
/// module.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("no source files supplied, nothing to analyze")]
    NoInput,
}
