//! BATCH rule: Spring Batch job factory methods.
//!
//! Matches `@Bean` methods returning `Job` on a batch-enabled
//! `@Configuration` class. The job name comes from the builder's
//! `.get("...")` call when present, then the `@Bean` name attribute, then
//! the method identifier. Step names are read best-effort out of the
//! builder chain; an empty step list is not an error.

use super::types::{BatchDetails, EntryPoint, EntryPointDetails, IntegrationType};
use super::{EntryRule, RuleMatch};
use crate::parsers::types::{find_annotation, has_annotation, MethodDecl, TypeDecl};

pub struct BatchRule;

impl EntryRule for BatchRule {
    fn integration_type(&self) -> IntegrationType {
        IntegrationType::Batch
    }

    fn matches_class(&self, class: &TypeDecl) -> bool {
        has_annotation(&class.annotations, &["Configuration"])
            && has_annotation(&class.annotations, &["EnableBatchProcessing"])
    }

    fn extract(&self, class: &TypeDecl, method: &MethodDecl, file: &str) -> Option<RuleMatch> {
        let bean = find_annotation(&method.annotations, "Bean")?;
        let returns_job = method
            .return_type
            .as_ref()
            .is_some_and(|t| t.name == "Job");
        if !returns_job {
            return None;
        }

        let job_name = method
            .invocations
            .iter()
            .find(|inv| inv.name == "get" && !inv.args.is_empty())
            .map(|inv| inv.args[0].clone())
            .or_else(|| bean.string_arg_any(&["value", "name"]))
            .unwrap_or_else(|| method.name.clone());

        let steps: Vec<String> = method
            .invocations
            .iter()
            .filter(|inv| matches!(inv.name.as_str(), "start" | "next" | "flow"))
            .filter_map(|inv| inv.args.first().cloned())
            .collect();

        Some(RuleMatch {
            entry_point: EntryPoint {
                integration_type: IntegrationType::Batch,
                declaring_class: class.qualified_name.clone(),
                method_name: method.name.clone(),
                file: file.to_string(),
                line: method.line,
                details: EntryPointDetails::Batch(BatchDetails { job_name, steps }),
                security: None,
                request_type: None,
                response_type: None,
                request_schema: None,
                response_schema: None,
                incomplete: false,
            },
            diagnostics: Vec::new(),
        })
    }
}
