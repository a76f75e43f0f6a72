//! Parallel loading of independent source files.
//!
//! Map phase of the two-phase pipeline: no shared mutable state, one task
//! per file, input order preserved in the output. Workers check the
//! cancellation token before parsing; units finished before cancellation
//! are retained so a cancelled run still yields partial, valid results.

use entrymap_core::traits::cancellation::Cancellable;
use entrymap_core::{Diagnostic, Stage};
use rayon::prelude::*;
use tracing::debug;

use super::java::JavaLoader;
use super::types::SourceUnit;
use crate::engine::SourceInput;

/// Parse every input into a `SourceUnit`, in parallel.
///
/// Returns units in input order plus load-stage diagnostics. Files skipped
/// because of cancellation produce neither a unit nor a diagnostic.
pub fn load_all(
    inputs: &[SourceInput],
    cancellation: &dyn Cancellable,
) -> (Vec<SourceUnit>, Vec<Diagnostic>) {
    let results: Vec<Option<(SourceUnit, Option<Diagnostic>)>> = inputs
        .par_iter()
        .map_init(
            || JavaLoader::new(),
            |loader, input| {
                if cancellation.is_cancelled() {
                    return None;
                }
                match loader {
                    Ok(loader) => Some(loader.load(&input.path, &input.source)),
                    Err(e) => {
                        // Grammar failures are per-worker, not per-run.
                        let diag = Diagnostic::new(Stage::Load, e.to_string())
                            .with_file(input.path.clone());
                        Some((
                            SourceUnit {
                                path: input.path.clone(),
                                package: None,
                                imports: Vec::new(),
                                declarations: Vec::new(),
                                parse_success: false,
                                content_hash: 0,
                                error_count: 0,
                            },
                            Some(diag),
                        ))
                    }
                }
            },
        )
        .collect();

    let mut units = Vec::with_capacity(inputs.len());
    let mut diagnostics = Vec::new();
    for result in results.into_iter().flatten() {
        let (unit, diag) = result;
        if let Some(diag) = diag {
            diagnostics.push(diag);
        }
        units.push(unit);
    }

    debug!(
        loaded = units.len(),
        failed = diagnostics.len(),
        "syntax loading complete"
    );
    (units, diagnostics)
}
