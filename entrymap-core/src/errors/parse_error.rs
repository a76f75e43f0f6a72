//! Syntax loader errors.

/// Errors that can occur while turning a source file into a declaration tree.
///
/// These never escape the loader boundary as failures of the whole run;
/// the loader converts them into a `parse_success = false` unit plus a
/// [`crate::Diagnostic`].
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to load Java grammar: {message}")]
    GrammarLoad { message: String },

    #[error("Tree-sitter returned no tree for {path}")]
    NoTree { path: String },

    #[error("Syntax errors in {path}: {error_count} ERROR node(s), first at line {line}")]
    SyntaxErrors {
        path: String,
        error_count: u32,
        line: u32,
    },
}
