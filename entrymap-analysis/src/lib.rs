//! Entry-point discovery and schema extraction for Java enterprise codebases.
//!
//! Given a set of `(path, source)` pairs, the engine parses each file into
//! an annotation-addressable declaration tree, builds a cross-file
//! declaration index, classifies every externally reachable entry point
//! (REST, messaging, scheduled, batch, CLI), resolves the request/response
//! data shapes flowing through each one, and merges everything into a
//! single [`aggregate::AnalysisResult`].
//!
//! The engine is best-effort by design: malformed files, unresolvable
//! types, and ambiguous rule matches become diagnostics on the result, not
//! run failures.

pub mod aggregate;
pub mod classify;
pub mod engine;
pub mod index;
pub mod parsers;
pub mod schema;

pub use aggregate::AnalysisResult;
pub use engine::{AnalysisEngine, SourceInput};
