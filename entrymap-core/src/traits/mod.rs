//! Trait seams shared across the workspace.

pub mod cancellation;
