//! Engine configuration knobs.

use serde::{Deserialize, Serialize};

/// Configuration for an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum recursion depth when resolving nested DTO schemas.
    /// Guards against cyclic type graphs; on hitting the bound the field
    /// keeps its type name and recursion stops.
    pub max_schema_depth: usize,

    /// Infer fields from `getX()`/`isX()` accessors when a DTO declares
    /// no instance fields.
    pub infer_fields_from_getters: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_schema_depth: 5,
            infer_fields_from_getters: true,
        }
    }
}
