//! Aggregator: merges per-file results into one `AnalysisResult`.
//!
//! Single-threaded final merge so the result is deterministically ordered:
//! entry points in discovery order (file, then declaration, then method),
//! schemas keyed in a sorted map, every diagnostic carried forward tagged
//! by stage.

use std::sync::Arc;

use entrymap_core::types::collections::BTreeMap;
use entrymap_core::Diagnostic;
use serde::{Deserialize, Serialize};

use crate::classify::types::{EntryPoint, IntegrationType};
use crate::schema::Schema;

/// Ranked application-type classification derived from the observed mix
/// of entry points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub primary_type: Option<IntegrationType>,
    /// Remaining observed types, by count descending then rule priority.
    pub secondary_types: Vec<IntegrationType>,
    /// Histogram keyed by integration-type name.
    pub counts: BTreeMap<String, usize>,
}

/// Top-level analysis output, handed to collaborators as a read-only
/// snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub entry_points: Vec<EntryPoint>,
    /// Qualified type name -> resolved schema, shared by reference.
    pub schemas: BTreeMap<String, Arc<Schema>>,
    pub classification: Classification,
    pub diagnostics: Vec<Diagnostic>,
    pub files_analyzed: usize,
    pub files_failed: usize,
}

/// Derive the primary/secondary classification from the entry-point mix.
///
/// Majority count wins; equal counts fall back to rule priority order,
/// so a REST/BATCH tie classifies as REST.
pub fn classify_application(entry_points: &[EntryPoint]) -> Classification {
    let mut histogram: BTreeMap<IntegrationType, usize> = BTreeMap::new();
    for ep in entry_points {
        *histogram.entry(ep.integration_type).or_default() += 1;
    }

    let mut ranked: Vec<(IntegrationType, usize)> =
        histogram.iter().map(|(t, c)| (*t, *c)).collect();
    // IntegrationType's Ord is the rule priority order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let primary_type = ranked.first().map(|(t, _)| *t);
    let secondary_types = ranked.iter().skip(1).map(|(t, _)| *t).collect();

    Classification {
        primary_type,
        secondary_types,
        counts: histogram
            .into_iter()
            .map(|(t, c)| (t.as_str().to_string(), c))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::types::EntryPointDetails;

    fn ep(integration_type: IntegrationType) -> EntryPoint {
        EntryPoint {
            integration_type,
            declaring_class: "p.C".into(),
            method_name: "m".into(),
            file: "C.java".into(),
            line: 1,
            details: EntryPointDetails::Cli,
            security: None,
            request_type: None,
            response_type: None,
            request_schema: None,
            response_schema: None,
            incomplete: false,
        }
    }

    #[test]
    fn majority_type_wins() {
        let eps = vec![
            ep(IntegrationType::Scheduled),
            ep(IntegrationType::Scheduled),
            ep(IntegrationType::Rest),
        ];
        let c = classify_application(&eps);
        assert_eq!(c.primary_type, Some(IntegrationType::Scheduled));
        assert_eq!(c.secondary_types, vec![IntegrationType::Rest]);
    }

    #[test]
    fn rest_wins_ties_over_batch() {
        let eps = vec![ep(IntegrationType::Batch), ep(IntegrationType::Rest)];
        let c = classify_application(&eps);
        assert_eq!(c.primary_type, Some(IntegrationType::Rest));
        assert_eq!(c.secondary_types, vec![IntegrationType::Batch]);
    }

    #[test]
    fn empty_mix_has_no_primary() {
        let c = classify_application(&[]);
        assert_eq!(c.primary_type, None);
        assert!(c.counts.is_empty());
    }
}
