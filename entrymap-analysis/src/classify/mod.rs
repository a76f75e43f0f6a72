//! Entry-point classifier: ordered rule table over declarations.
//!
//! Each rule is a predicate over class/method annotations plus an
//! extraction function. Rules are evaluated per method in a fixed priority
//! order (REST > MESSAGING > SCHEDULED > BATCH); the first match wins and
//! any runner-up is recorded as a rule-ambiguity diagnostic. CLI is the
//! class-scoped fallback, applied only when no method-scoped rule fired
//! for the class. Adding a framework means adding a rule, not touching
//! existing ones.

pub mod batch;
pub mod cli;
pub mod messaging;
pub mod rest;
pub mod scheduled;
pub mod security;
pub mod types;

use entrymap_core::{Diagnostic, Stage};
use tracing::debug;

use crate::parsers::types::{MethodDecl, SourceUnit, TypeDecl};
use self::types::{EntryPoint, IntegrationType, SecurityRule};

/// One classification rule: predicate + extraction.
pub trait EntryRule: Send + Sync {
    fn integration_type(&self) -> IntegrationType;

    /// Cheap class-level gate; `extract` is only called when this passes.
    fn matches_class(&self, class: &TypeDecl) -> bool;

    /// Classify one method. `None` means the rule does not apply.
    fn extract(&self, class: &TypeDecl, method: &MethodDecl, file: &str) -> Option<RuleMatch>;
}

/// Result of a rule firing: the entry point plus any extraction
/// diagnostics (partially extracted fields, unparseable expressions).
pub struct RuleMatch {
    pub entry_point: EntryPoint,
    pub diagnostics: Vec<Diagnostic>,
}

/// The method-scoped rule table, in priority order.
pub fn default_rules() -> Vec<Box<dyn EntryRule>> {
    vec![
        Box::new(rest::RestRule),
        Box::new(messaging::MessagingRule),
        Box::new(scheduled::ScheduledRule),
        Box::new(batch::BatchRule),
    ]
}

/// Classify every declaration of one unit.
///
/// Output order is deterministic: declaration order within the file, then
/// method order within the declaration.
pub fn classify_unit(
    unit: &SourceUnit,
    rules: &[Box<dyn EntryRule>],
) -> (Vec<EntryPoint>, Vec<Diagnostic>) {
    let mut entry_points = Vec::new();
    let mut diagnostics = Vec::new();

    for decl in &unit.declarations {
        let class_security = security::from_annotations(&decl.annotations);
        let before = entry_points.len();

        for method in &decl.methods {
            let mut matches: Vec<(IntegrationType, RuleMatch)> = rules
                .iter()
                .filter(|rule| rule.matches_class(decl))
                .filter_map(|rule| {
                    rule.extract(decl, method, &unit.path)
                        .map(|m| (rule.integration_type(), m))
                })
                .collect();

            if matches.is_empty() {
                continue;
            }
            if matches.len() > 1 {
                let runner_up = matches[1].0;
                diagnostics.push(
                    Diagnostic::new(
                        Stage::Classify,
                        format!(
                            "{}.{} matched {} and {}; keeping {}",
                            decl.qualified_name,
                            method.name,
                            matches[0].0.as_str(),
                            runner_up.as_str(),
                            matches[0].0.as_str(),
                        ),
                    )
                    .with_file(unit.path.clone())
                    .with_line(method.line),
                );
            }

            let (integration_type, matched) = matches.remove(0);
            let mut entry_point = matched.entry_point;
            diagnostics.extend(matched.diagnostics);

            entry_point.security = resolve_security(
                integration_type,
                security::from_annotations(&method.annotations),
                class_security.clone(),
            );
            entry_points.push(entry_point);
        }

        // CLI fallback: a conventional main method on a class no other
        // rule claimed.
        if entry_points.len() == before {
            if let Some(ep) = cli::extract_main(decl, &unit.path) {
                entry_points.push(ep);
            }
        }
    }

    debug!(
        file = %unit.path,
        entry_points = entry_points.len(),
        "classification complete"
    );
    (entry_points, diagnostics)
}

/// Most specific wins: method-level overrides class-level. An HTTP-exposed
/// method with no recognized annotation defaults to public.
fn resolve_security(
    integration_type: IntegrationType,
    method_level: Option<SecurityRule>,
    class_level: Option<SecurityRule>,
) -> Option<SecurityRule> {
    match method_level.or(class_level) {
        Some(rule) => Some(rule),
        None if integration_type == IntegrationType::Rest => Some(SecurityRule::public()),
        None => None,
    }
}
