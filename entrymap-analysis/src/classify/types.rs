//! Entry-point output model.
//!
//! The closed set of integration types and their per-type payloads. Every
//! entry point references a declaration that existed in some source unit;
//! nothing here is constructed speculatively.

use serde::{Deserialize, Serialize};

use crate::parsers::types::TypeRef;

/// Category of trigger mechanism, in rule-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IntegrationType {
    Rest,
    Messaging,
    Scheduled,
    Batch,
    Cli,
}

impl IntegrationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rest => "REST",
            Self::Messaging => "MESSAGING",
            Self::Scheduled => "SCHEDULED",
            Self::Batch => "BATCH",
            Self::Cli => "CLI",
        }
    }
}

/// One externally triggerable execution surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryPoint {
    pub integration_type: IntegrationType,
    /// Qualified name of the declaring class.
    pub declaring_class: String,
    pub method_name: String,
    pub file: String,
    pub line: u32,
    pub details: EntryPointDetails,
    pub security: Option<SecurityRule>,
    /// Request payload type, post wrapper-unwrapping; resolver input.
    pub request_type: Option<TypeRef>,
    /// Response payload type, post wrapper-unwrapping; resolver input.
    pub response_type: Option<TypeRef>,
    /// Qualified-name key into the result's schema map, once resolved.
    pub request_schema: Option<String>,
    pub response_schema: Option<String>,
    /// Some required fields could not be extracted; a diagnostic explains
    /// what is missing. The entry point is still emitted.
    pub incomplete: bool,
}

/// Type-specific payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryPointDetails {
    Rest(RestDetails),
    Messaging(MessagingDetails),
    Scheduled(ScheduleDetails),
    Batch(BatchDetails),
    Cli,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestFramework {
    SpringMvc,
    JaxRs,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestDetails {
    pub http_method: String,
    /// Class-level and method-level segments joined, duplicate slashes
    /// collapsed, leading slash enforced.
    pub path: String,
    pub framework: RestFramework,
    pub parameters: Vec<ParamBinding>,
    /// Declared return type as written, wrappers included.
    pub return_type: Option<String>,
    /// True when the return type was wrapped in `Mono`/`Flux`/`Publisher`.
    pub reactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamKind {
    Path,
    Query,
    Header,
    Body,
}

/// A bound handler parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamBinding {
    pub name: String,
    pub type_name: String,
    pub kind: ParamKind,
    pub required: bool,
    pub default_value: Option<String>,
    /// Wire name when it differs from the Java parameter name.
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessagingSystem {
    Kafka,
    Jms,
    Rabbit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingDetails {
    pub system: MessagingSystem,
    /// Topic / queue / destination names.
    pub destinations: Vec<String>,
    pub group_id: Option<String>,
    /// Payload parameter type name.
    pub payload_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleKind {
    Cron,
    FixedRate,
    FixedDelay,
    Unknown,
}

/// Raw schedule expression; evaluation is a downstream concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDetails {
    pub kind: ScheduleKind,
    pub expression: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDetails {
    pub job_name: String,
    /// Ordered step names from the builder chain, best effort.
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthType {
    PreAuthorize,
    Secured,
    RolesAllowed,
    PermitAll,
    DenyAll,
}

/// Access-control rule attached to an entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityRule {
    pub auth_type: Option<AuthType>,
    pub expression: Option<String>,
    pub roles: Vec<String>,
    pub is_public: bool,
}

impl SecurityRule {
    /// Default for an HTTP-exposed method with no recognized annotation.
    pub fn public() -> Self {
        Self {
            auth_type: None,
            expression: None,
            roles: Vec::new(),
            is_public: true,
        }
    }
}
