//! MESSAGING rule: Kafka, JMS, and RabbitMQ listener methods.

use entrymap_core::{Diagnostic, Stage};

use super::types::{
    EntryPoint, EntryPointDetails, IntegrationType, MessagingDetails, MessagingSystem,
};
use super::{EntryRule, RuleMatch};
use crate::parsers::types::{find_annotation, MethodDecl, TypeDecl, TypeRef};

pub struct MessagingRule;

impl EntryRule for MessagingRule {
    fn integration_type(&self) -> IntegrationType {
        IntegrationType::Messaging
    }

    fn matches_class(&self, _class: &TypeDecl) -> bool {
        // Listener annotations are method-level; any class may carry them.
        true
    }

    fn extract(&self, class: &TypeDecl, method: &MethodDecl, file: &str) -> Option<RuleMatch> {
        let (annotation, system, dest_attrs) = method.annotations.iter().find_map(|a| {
            match a.name.as_str() {
                "KafkaListener" => Some((a, MessagingSystem::Kafka, &["topics", "value"][..])),
                "JmsListener" => Some((a, MessagingSystem::Jms, &["destination", "value"][..])),
                "RabbitListener" => Some((a, MessagingSystem::Rabbit, &["queues", "value"][..])),
                _ => None,
            }
        })?;

        let destinations: Vec<String> = dest_attrs
            .iter()
            .find_map(|attr| annotation.arg(attr))
            .map(|v| v.string_values())
            .unwrap_or_default();

        let mut diagnostics = Vec::new();
        let incomplete = destinations.is_empty();
        if incomplete {
            diagnostics.push(
                Diagnostic::new(
                    Stage::Classify,
                    format!(
                        "{}.{}: listener has no extractable destination",
                        class.qualified_name, method.name
                    ),
                )
                .with_file(file)
                .with_line(method.line),
            );
        }

        let payload = payload_parameter(method);

        Some(RuleMatch {
            entry_point: EntryPoint {
                integration_type: IntegrationType::Messaging,
                declaring_class: class.qualified_name.clone(),
                method_name: method.name.clone(),
                file: file.to_string(),
                line: method.line,
                details: EntryPointDetails::Messaging(MessagingDetails {
                    system,
                    destinations,
                    group_id: annotation.string_arg("groupId"),
                    payload_type: payload.as_ref().map(|t| t.display()),
                }),
                security: None,
                request_type: payload,
                response_type: None,
                request_schema: None,
                response_schema: None,
                incomplete,
            },
            diagnostics,
        })
    }
}

/// The message payload parameter: `@Payload` when present, otherwise the
/// first parameter not bound to headers or the message key.
fn payload_parameter(method: &MethodDecl) -> Option<TypeRef> {
    if let Some(param) = method
        .parameters
        .iter()
        .find(|p| find_annotation(&p.annotations, "Payload").is_some())
    {
        return Some(param.type_ref.clone());
    }
    method
        .parameters
        .iter()
        .find(|p| {
            !p.annotations
                .iter()
                .any(|a| matches!(a.name.as_str(), "Header" | "Headers"))
        })
        .map(|p| p.type_ref.clone())
}
