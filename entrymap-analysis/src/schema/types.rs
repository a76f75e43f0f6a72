//! Resolved data shapes for request/response payload types.

use serde::{Deserialize, Serialize};

/// Resolved shape of a DTO used as a request or response body.
///
/// Shared read-only across all entry points that reference the type
/// (`Arc<Schema>` in the resolver's memo map); resolved at most once per
/// qualified name per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    pub qualified_name: String,
    pub fields: Vec<Field>,
}

/// One field of a schema. Nested DTO types are referenced by `type_name`
/// and resolved into the top-level schema map, not inlined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub type_name: String,
    pub required: bool,
    /// Recognized validation annotations, formatted as written,
    /// e.g. `@Size(min=1, max=40)`.
    pub constraints: Vec<String>,
    pub default_value: Option<String>,
}
