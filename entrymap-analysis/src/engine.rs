//! Pipeline orchestration.
//!
//! Load (parallel map, no shared state) → barrier → declaration index →
//! classify (parallel per unit over the frozen index) → schema resolution
//! (single-threaded, memoized) → aggregate (single-threaded merge).

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use entrymap_core::traits::cancellation::Cancellable;
use entrymap_core::{AnalysisConfig, AnalysisError, Diagnostic};

use crate::aggregate::{classify_application, AnalysisResult};
use crate::classify::types::EntryPoint;
use crate::classify::{classify_unit, default_rules, EntryRule};
use crate::index::DeclarationIndex;
use crate::parsers::load_all;
use crate::schema::SchemaResolver;

/// One `(path, UTF-8 source)` pair supplied by the external source-tree
/// collaborator. This engine never reads the filesystem itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInput {
    pub path: String,
    pub source: String,
}

impl SourceInput {
    pub fn new(path: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// The entry-point discovery engine.
pub struct AnalysisEngine {
    config: AnalysisConfig,
    rules: Vec<Box<dyn EntryRule>>,
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl AnalysisEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            rules: default_rules(),
        }
    }

    /// Run the full analysis over the supplied sources.
    ///
    /// The only fatal condition is an empty input set; every other failure
    /// is a diagnostic on the result. Cancellation stops scheduling of new
    /// file tasks; work finished before the signal is kept.
    pub fn analyze(
        &self,
        inputs: &[SourceInput],
        cancellation: &dyn Cancellable,
    ) -> Result<AnalysisResult, AnalysisError> {
        if inputs.is_empty() {
            return Err(AnalysisError::NoInput);
        }

        let (units, mut diagnostics) = load_all(inputs, cancellation);
        let files_failed = units.iter().filter(|u| !u.parse_success).count();

        // Barrier: the index is built once, after all loader tasks
        // complete, and is never mutated afterwards.
        let (index, index_diags) = DeclarationIndex::build(&units);
        diagnostics.extend(index_diags);
        info!(
            files = units.len(),
            declarations = index.len(),
            "declaration index frozen"
        );

        let per_unit: Vec<(Vec<EntryPoint>, Vec<Diagnostic>)> = units
            .par_iter()
            .map(|unit| {
                if unit.parse_success {
                    classify_unit(unit, &self.rules)
                } else {
                    (Vec::new(), Vec::new())
                }
            })
            .collect();

        let mut entry_points = Vec::new();
        for (eps, diags) in per_unit {
            entry_points.extend(eps);
            diagnostics.extend(diags);
        }

        let mut resolver = SchemaResolver::new(&index, &self.config);
        for ep in &mut entry_points {
            ep.request_schema = ep.request_type.as_ref().and_then(|t| resolver.resolve(t));
            ep.response_schema = ep.response_type.as_ref().and_then(|t| resolver.resolve(t));
        }
        let (schemas, resolve_diags) = resolver.into_parts();
        diagnostics.extend(resolve_diags);

        let classification = classify_application(&entry_points);
        info!(
            entry_points = entry_points.len(),
            schemas = schemas.len(),
            diagnostics = diagnostics.len(),
            "analysis complete"
        );

        Ok(AnalysisResult {
            entry_points,
            schemas: schemas.into_iter().collect(),
            classification,
            diagnostics,
            files_analyzed: units.len(),
            files_failed,
        })
    }
}
