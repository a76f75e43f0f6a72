//! Syntax loading: tree-sitter parse of Java sources into [`SourceUnit`]s.

pub mod java;
pub mod loader;
pub mod types;

pub use java::JavaLoader;
pub use loader::load_all;
pub use types::SourceUnit;
