//! REST rule: Spring MVC controllers and JAX-RS resources.

use entrymap_core::{Diagnostic, Stage};

use super::types::{
    EntryPoint, EntryPointDetails, IntegrationType, ParamBinding, ParamKind, RestDetails,
    RestFramework,
};
use super::{EntryRule, RuleMatch};
use crate::parsers::types::{
    find_annotation, has_annotation, Annotation, AnnotationValue, MethodDecl, TypeDecl, TypeRef,
};

const SPRING_VERBS: &[(&str, &str)] = &[
    ("GetMapping", "GET"),
    ("PostMapping", "POST"),
    ("PutMapping", "PUT"),
    ("DeleteMapping", "DELETE"),
    ("PatchMapping", "PATCH"),
];

const JAXRS_VERBS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

/// Wrapper types whose single type argument is the real payload.
const PAYLOAD_WRAPPERS: &[&str] = &[
    "ResponseEntity",
    "HttpEntity",
    "Mono",
    "Flux",
    "Publisher",
    "CompletableFuture",
    "DeferredResult",
    "Callable",
    "Optional",
];

const REACTIVE_WRAPPERS: &[&str] = &["Mono", "Flux", "Publisher"];

pub struct RestRule;

impl EntryRule for RestRule {
    fn integration_type(&self) -> IntegrationType {
        IntegrationType::Rest
    }

    fn matches_class(&self, class: &TypeDecl) -> bool {
        has_annotation(&class.annotations, &["RestController", "Controller", "Path"])
    }

    fn extract(&self, class: &TypeDecl, method: &MethodDecl, file: &str) -> Option<RuleMatch> {
        if has_annotation(&class.annotations, &["RestController", "Controller"]) {
            extract_spring(class, method, file)
        } else {
            extract_jaxrs(class, method, file)
        }
    }
}

fn extract_spring(class: &TypeDecl, method: &MethodDecl, file: &str) -> Option<RuleMatch> {
    let (mapping, http_method) = find_spring_mapping(method)?;
    let mut diagnostics = Vec::new();
    let mut incomplete = false;

    let base = class
        .annotations
        .iter()
        .find(|a| a.name == "RequestMapping")
        .and_then(path_of);
    let segment = match path_of_checked(mapping) {
        Ok(segment) => segment,
        Err(()) => {
            incomplete = true;
            diagnostics.push(
                Diagnostic::new(
                    Stage::Classify,
                    format!(
                        "{}.{}: unparseable path expression on @{}",
                        class.qualified_name, method.name, mapping.name
                    ),
                )
                .with_file(file)
                .with_line(method.line),
            );
            None
        }
    };
    let path = join_paths(base.as_deref(), segment.as_deref());

    let (parameters, body_type) = extract_bindings(method, RestFramework::SpringMvc);
    let (response_type, reactive) = unwrap_payload(method.return_type.as_ref());

    Some(RuleMatch {
        entry_point: EntryPoint {
            integration_type: IntegrationType::Rest,
            declaring_class: class.qualified_name.clone(),
            method_name: method.name.clone(),
            file: file.to_string(),
            line: method.line,
            details: EntryPointDetails::Rest(RestDetails {
                http_method,
                path,
                framework: RestFramework::SpringMvc,
                parameters,
                return_type: method.return_type.as_ref().map(|t| t.display()),
                reactive,
            }),
            security: None,
            request_type: body_type,
            response_type,
            request_schema: None,
            response_schema: None,
            incomplete,
        },
        diagnostics,
    })
}

fn extract_jaxrs(class: &TypeDecl, method: &MethodDecl, file: &str) -> Option<RuleMatch> {
    let verb = method
        .annotations
        .iter()
        .find(|a| JAXRS_VERBS.contains(&a.name.as_str()))?;

    let base = find_annotation(&class.annotations, "Path").and_then(path_of);
    let segment = find_annotation(&method.annotations, "Path").and_then(path_of);
    let path = join_paths(base.as_deref(), segment.as_deref());

    let (parameters, body_type) = extract_bindings(method, RestFramework::JaxRs);
    let (response_type, reactive) = unwrap_payload(method.return_type.as_ref());

    Some(RuleMatch {
        entry_point: EntryPoint {
            integration_type: IntegrationType::Rest,
            declaring_class: class.qualified_name.clone(),
            method_name: method.name.clone(),
            file: file.to_string(),
            line: method.line,
            details: EntryPointDetails::Rest(RestDetails {
                http_method: verb.name.clone(),
                path,
                framework: RestFramework::JaxRs,
                parameters,
                return_type: method.return_type.as_ref().map(|t| t.display()),
                reactive,
            }),
            security: None,
            request_type: body_type,
            response_type,
            request_schema: None,
            response_schema: None,
            incomplete: false,
        },
        diagnostics: Vec::new(),
    })
}

/// Find the method's mapping annotation and its HTTP verb.
/// `@RequestMapping` resolves its `method` attribute, defaulting to GET.
fn find_spring_mapping(method: &MethodDecl) -> Option<(&Annotation, String)> {
    for annotation in &method.annotations {
        if let Some((_, verb)) = SPRING_VERBS.iter().find(|(n, _)| *n == annotation.name) {
            return Some((annotation, verb.to_string()));
        }
        if annotation.name == "RequestMapping" {
            let verb = annotation
                .string_arg("method")
                .and_then(|m| {
                    m.rsplit('.')
                        .next()
                        .map(|v| v.to_ascii_uppercase())
                })
                .unwrap_or_else(|| "GET".to_string());
            return Some((annotation, verb));
        }
    }
    None
}

/// Path attribute of a mapping annotation (`value` or `path`, first array
/// element when the attribute is an array).
fn path_of(annotation: &Annotation) -> Option<String> {
    path_of_checked(annotation).ok().flatten()
}

/// Like [`path_of`], but distinguishes "no path attribute" (`Ok(None)`)
/// from "attribute present but not a string literal" (`Err`).
fn path_of_checked(annotation: &Annotation) -> Result<Option<String>, ()> {
    let value = match annotation.arg("value").or_else(|| annotation.arg("path")) {
        Some(value) => value,
        None => return Ok(None),
    };
    let first = match value {
        AnnotationValue::Array(items) => items.first().ok_or(())?,
        other => other,
    };
    match first {
        AnnotationValue::Str(s) => Ok(Some(s.clone())),
        _ => Err(()),
    }
}

/// Concatenate class-level and method-level segments, collapse duplicate
/// slashes, enforce a leading slash.
fn join_paths(base: Option<&str>, segment: Option<&str>) -> String {
    let mut full = format!("{}{}", base.unwrap_or(""), segment.unwrap_or(""));
    while full.contains("//") {
        full = full.replace("//", "/");
    }
    if !full.starts_with('/') {
        full.insert(0, '/');
    }
    full
}

/// Binding annotations on handler parameters, plus the body payload type.
fn extract_bindings(
    method: &MethodDecl,
    framework: RestFramework,
) -> (Vec<ParamBinding>, Option<TypeRef>) {
    let mut bindings = Vec::new();
    let mut body_type = None;

    for param in &method.parameters {
        let mut bound = false;
        for annotation in &param.annotations {
            let (kind, required_default) = match (framework, annotation.name.as_str()) {
                (RestFramework::SpringMvc, "PathVariable") => (ParamKind::Path, true),
                (RestFramework::SpringMvc, "RequestParam") => (ParamKind::Query, true),
                (RestFramework::SpringMvc, "RequestHeader") => (ParamKind::Header, true),
                (RestFramework::SpringMvc, "RequestBody") => (ParamKind::Body, true),
                (RestFramework::JaxRs, "PathParam") => (ParamKind::Path, true),
                (RestFramework::JaxRs, "QueryParam") => (ParamKind::Query, false),
                (RestFramework::JaxRs, "HeaderParam") => (ParamKind::Header, false),
                _ => continue,
            };
            bound = true;

            let required = match annotation.arg("required") {
                Some(AnnotationValue::Bool(b)) => *b,
                Some(AnnotationValue::Ident(s)) => s == "true",
                _ => required_default,
            };
            let default_value = annotation
                .string_arg("defaultValue")
                .or_else(|| default_value_annotation(param));
            let alias = annotation
                .string_arg_any(&["value", "name"])
                .filter(|a| *a != param.name);

            if kind == ParamKind::Body {
                body_type = Some(param.type_ref.clone());
            }
            bindings.push(ParamBinding {
                name: param.name.clone(),
                type_name: param.type_ref.display(),
                kind,
                required,
                default_value,
                alias,
            });
        }

        // JAX-RS: an unannotated parameter is the request body.
        if !bound && framework == RestFramework::JaxRs {
            body_type = Some(param.type_ref.clone());
            bindings.push(ParamBinding {
                name: param.name.clone(),
                type_name: param.type_ref.display(),
                kind: ParamKind::Body,
                required: true,
                default_value: None,
                alias: None,
            });
        }
    }

    (bindings, body_type)
}

/// JAX-RS `@DefaultValue` lives beside the binding annotation.
fn default_value_annotation(param: &crate::parsers::types::Parameter) -> Option<String> {
    find_annotation(&param.annotations, "DefaultValue").and_then(|a| a.string_arg("value"))
}

/// Unwrap reactive/async wrappers down to the inner payload type.
/// Returns the payload (None for `void` or bare wrappers) and whether a
/// reactive wrapper was seen anywhere in the chain.
pub fn unwrap_payload(return_type: Option<&TypeRef>) -> (Option<TypeRef>, bool) {
    let mut current = match return_type {
        Some(t) => t.clone(),
        None => return (None, false),
    };
    let mut reactive = false;

    loop {
        if matches!(current.name.as_str(), "void" | "Void") {
            return (None, reactive);
        }
        if PAYLOAD_WRAPPERS.contains(&current.name.as_str()) {
            reactive |= REACTIVE_WRAPPERS.contains(&current.name.as_str());
            match current.type_args.first() {
                Some(inner) => {
                    current = inner.clone();
                    continue;
                }
                None => return (None, reactive),
            }
        }
        return (Some(current), reactive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_collapses_duplicate_slashes() {
        assert_eq!(join_paths(Some("/api/v1/"), Some("/orders")), "/api/v1/orders");
        assert_eq!(join_paths(Some("/api/v1/payments"), Some("")), "/api/v1/payments");
        assert_eq!(join_paths(None, Some("health")), "/health");
        assert_eq!(join_paths(None, None), "/");
    }

    #[test]
    fn unwraps_nested_reactive_wrappers() {
        let t = TypeRef {
            name: "Mono".into(),
            type_args: vec![TypeRef {
                name: "ResponseEntity".into(),
                type_args: vec![TypeRef::simple("Product")],
                array_dims: 0,
            }],
            array_dims: 0,
        };
        let (payload, reactive) = unwrap_payload(Some(&t));
        assert_eq!(payload.unwrap().name, "Product");
        assert!(reactive);
    }

    #[test]
    fn response_entity_alone_is_not_reactive() {
        let t = TypeRef {
            name: "ResponseEntity".into(),
            type_args: vec![TypeRef::simple("Account")],
            array_dims: 0,
        };
        let (payload, reactive) = unwrap_payload(Some(&t));
        assert_eq!(payload.unwrap().name, "Account");
        assert!(!reactive);
    }
}
