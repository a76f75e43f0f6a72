//! Schema resolver: walks referenced DTO types into field schemas.
//!
//! Resolution recursively follows field types through the declaration
//! index, bounded by a fixed depth and guarded against cycles: on hitting
//! either, the field keeps its type name and recursion stops, a
//! termination policy, not an error. Schemas are memoized by qualified
//! name so N entry points referencing the same DTO pay resolution cost
//! once, and shared as read-only `Arc` values.

pub mod types;

use std::sync::Arc;

use entrymap_core::{AnalysisConfig, Diagnostic, Stage};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

pub use types::{Field, Schema};

use crate::index::DeclarationIndex;
use crate::parsers::types::{Annotation, DeclKind, TypeDecl, TypeRef};

/// Validation annotations that imply a required field.
const REQUIRED_ANNOTATIONS: &[&str] = &["NotNull", "NotEmpty", "NotBlank", "NonNull"];

/// All validation annotations captured as constraints.
const VALIDATION_ANNOTATIONS: &[&str] = &[
    "NotNull",
    "NotEmpty",
    "NotBlank",
    "NonNull",
    "Size",
    "Min",
    "Max",
    "Range",
    "Email",
    "Pattern",
    "URL",
    "Positive",
    "PositiveOrZero",
    "Negative",
    "NegativeOrZero",
    "Past",
    "PastOrPresent",
    "Future",
    "FutureOrPresent",
    "Digits",
    "DecimalMin",
    "DecimalMax",
    "Valid",
];

const COLLECTION_TYPES: &[&str] = &[
    "List",
    "Set",
    "Collection",
    "Iterable",
    "ArrayList",
    "HashSet",
    "LinkedList",
];

const MAP_TYPES: &[&str] = &["Map", "HashMap", "LinkedHashMap", "TreeMap"];

/// Primitives and common library types with no further structure.
const LIBRARY_TYPES: &[&str] = &[
    "void", "Void", "boolean", "byte", "short", "int", "long", "char", "float", "double",
    "Boolean", "Byte", "Short", "Integer", "Long", "Character", "Float", "Double", "Number",
    "String", "CharSequence", "Object", "BigDecimal", "BigInteger", "UUID", "Date", "Instant",
    "LocalDate", "LocalTime", "LocalDateTime", "OffsetDateTime", "ZonedDateTime", "Duration",
    "Period", "?",
];

pub struct SchemaResolver<'a> {
    index: &'a DeclarationIndex,
    max_depth: usize,
    infer_getters: bool,
    schemas: FxHashMap<String, Arc<Schema>>,
    in_progress: FxHashSet<String>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> SchemaResolver<'a> {
    pub fn new(index: &'a DeclarationIndex, config: &AnalysisConfig) -> Self {
        Self {
            index,
            max_depth: config.max_schema_depth,
            infer_getters: config.infer_fields_from_getters,
            schemas: FxHashMap::default(),
            in_progress: FxHashSet::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Resolve a type reference into the schema map.
    ///
    /// Returns the qualified-name key of the resolved schema, or `None`
    /// for primitives, library types, and types absent from the index.
    pub fn resolve(&mut self, type_ref: &TypeRef) -> Option<String> {
        self.resolve_at(type_ref, 0)
    }

    /// Consume the resolver, yielding the memoized schemas and the
    /// resolution diagnostics.
    pub fn into_parts(self) -> (FxHashMap<String, Arc<Schema>>, Vec<Diagnostic>) {
        (self.schemas, self.diagnostics)
    }

    fn resolve_at(&mut self, type_ref: &TypeRef, depth: usize) -> Option<String> {
        // Collections resolve through their element type; maps and arrays
        // of library types are terminal.
        if type_ref.array_dims > 0 {
            let mut element = type_ref.clone();
            element.array_dims = 0;
            return self.resolve_at(&element, depth);
        }
        let name = type_ref.name.as_str();
        if COLLECTION_TYPES.contains(&name) {
            return match type_ref.type_args.first() {
                Some(inner) => self.resolve_at(inner, depth),
                None => None,
            };
        }
        if MAP_TYPES.contains(&name) || LIBRARY_TYPES.contains(&name) {
            return None;
        }

        let decl = match self.index.resolve(name) {
            Some(decl) => decl.clone(),
            None => {
                // ResolutionGap: external/library type or missing source.
                self.diagnostics.push(Diagnostic::new(
                    Stage::Resolve,
                    format!("type {name} not found in source tree; schema unresolved"),
                ));
                return None;
            }
        };
        let qualified = decl.qualified_name.clone();

        if self.schemas.contains_key(&qualified) || self.in_progress.contains(&qualified) {
            // Memo hit, or a cycle back into a type currently being
            // resolved; either way the key is (or will be) in the map.
            return Some(qualified);
        }
        if depth >= self.max_depth {
            trace!(type_name = %qualified, depth, "schema depth bound reached");
            return None;
        }

        self.in_progress.insert(qualified.clone());
        let fields = self.extract_fields(&decl, depth);
        self.in_progress.remove(&qualified);

        self.schemas.insert(
            qualified.clone(),
            Arc::new(Schema {
                qualified_name: qualified.clone(),
                fields,
            }),
        );
        Some(qualified)
    }

    fn extract_fields(&mut self, decl: &TypeDecl, depth: usize) -> Vec<Field> {
        let mut fields = Vec::new();

        if decl.kind == DeclKind::Record {
            for component in &decl.components {
                // Record components are implicitly required.
                fields.push(self.field_from(
                    &component.name,
                    &component.type_ref,
                    &component.annotations,
                    true,
                    None,
                    depth,
                ));
            }
            return fields;
        }

        for field in &decl.fields {
            if field
                .annotations
                .iter()
                .any(|a| matches!(a.name.as_str(), "JsonIgnore" | "Transient"))
            {
                continue;
            }
            fields.push(self.field_from(
                &field.name,
                &field.type_ref,
                &field.annotations,
                false,
                field.default_value.clone(),
                depth,
            ));
        }

        // Classes exposing state only through accessors: infer from
        // getX()/isX() signatures.
        if fields.is_empty() && self.infer_getters {
            fields = self.infer_from_getters(decl, depth);
        }
        fields
    }

    fn field_from(
        &mut self,
        name: &str,
        type_ref: &TypeRef,
        annotations: &[Annotation],
        required_default: bool,
        default_value: Option<String>,
        depth: usize,
    ) -> Field {
        let required = required_default
            || annotations
                .iter()
                .any(|a| REQUIRED_ANNOTATIONS.contains(&a.name.as_str()));
        let constraints = annotations
            .iter()
            .filter(|a| VALIDATION_ANNOTATIONS.contains(&a.name.as_str()))
            .map(format_constraint)
            .collect();

        // Follow the field's type so nested DTOs land in the schema map.
        self.resolve_at(type_ref, depth + 1);

        Field {
            name: name.to_string(),
            type_name: type_ref.display(),
            required,
            constraints,
            default_value,
        }
    }

    fn infer_from_getters(&mut self, decl: &TypeDecl, depth: usize) -> Vec<Field> {
        let mut fields = Vec::new();
        let mut seen = FxHashSet::default();
        for method in &decl.methods {
            if !method.parameters.is_empty() {
                continue;
            }
            let property = method
                .name
                .strip_prefix("get")
                .or_else(|| method.name.strip_prefix("is"));
            let Some(property) = property.filter(|p| !p.is_empty()) else {
                continue;
            };
            let name = decapitalize(property);
            if !seen.insert(name.clone()) {
                continue;
            }
            let type_ref = method
                .return_type
                .clone()
                .unwrap_or_else(|| TypeRef::simple("Object"));
            if type_ref.name == "void" {
                continue;
            }
            self.resolve_at(&type_ref, depth + 1);
            fields.push(Field {
                name,
                type_name: type_ref.display(),
                required: false,
                constraints: Vec::new(),
                default_value: None,
            });
        }
        fields
    }
}

fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Format a validation annotation for display: `@Size(min=1, max=40)`.
/// The implicit `value` element renders bare, as written: `@Min(1)`.
fn format_constraint(annotation: &Annotation) -> String {
    if annotation.args.is_empty() {
        return format!("@{}", annotation.name);
    }
    if annotation.args.len() == 1 && annotation.args[0].name == "value" {
        let values = annotation.args[0].value.string_values().join(", ");
        return format!("@{}({})", annotation.name, values);
    }
    let args: Vec<String> = annotation
        .args
        .iter()
        .map(|arg| {
            let values = arg.value.string_values().join(", ");
            format!("{}={}", arg.name, values)
        })
        .collect();
    format!("@{}({})", annotation.name, args.join(", "))
}
