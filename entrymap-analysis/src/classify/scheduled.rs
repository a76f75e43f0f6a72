//! SCHEDULED rule: `@Scheduled` methods.
//!
//! The schedule expression is captured verbatim and never evaluated;
//! evaluation is a downstream concern.

use entrymap_core::{Diagnostic, Stage};

use super::types::{EntryPoint, EntryPointDetails, IntegrationType, ScheduleDetails, ScheduleKind};
use super::{EntryRule, RuleMatch};
use crate::parsers::types::{find_annotation, MethodDecl, TypeDecl};

pub struct ScheduledRule;

impl EntryRule for ScheduledRule {
    fn integration_type(&self) -> IntegrationType {
        IntegrationType::Scheduled
    }

    fn matches_class(&self, _class: &TypeDecl) -> bool {
        true
    }

    fn extract(&self, class: &TypeDecl, method: &MethodDecl, file: &str) -> Option<RuleMatch> {
        let annotation = find_annotation(&method.annotations, "Scheduled")?;

        let (kind, expression) = [
            ("cron", ScheduleKind::Cron),
            ("fixedRate", ScheduleKind::FixedRate),
            ("fixedDelay", ScheduleKind::FixedDelay),
            ("fixedRateString", ScheduleKind::FixedRate),
            ("fixedDelayString", ScheduleKind::FixedDelay),
        ]
        .iter()
        .find_map(|(attr, kind)| annotation.string_arg(attr).map(|expr| (*kind, expr)))
        .unwrap_or((ScheduleKind::Unknown, String::new()));

        let mut diagnostics = Vec::new();
        let incomplete = kind == ScheduleKind::Unknown;
        if incomplete {
            diagnostics.push(
                Diagnostic::new(
                    Stage::Classify,
                    format!(
                        "{}.{}: @Scheduled without a recognized trigger attribute",
                        class.qualified_name, method.name
                    ),
                )
                .with_file(file)
                .with_line(method.line),
            );
        }

        Some(RuleMatch {
            entry_point: EntryPoint {
                integration_type: IntegrationType::Scheduled,
                declaring_class: class.qualified_name.clone(),
                method_name: method.name.clone(),
                file: file.to_string(),
                line: method.line,
                details: EntryPointDetails::Scheduled(ScheduleDetails { kind, expression }),
                security: None,
                request_type: None,
                response_type: None,
                request_schema: None,
                response_schema: None,
                incomplete,
            },
            diagnostics,
        })
    }
}
