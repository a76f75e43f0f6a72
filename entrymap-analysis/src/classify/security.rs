//! Security annotation extraction.
//!
//! Recognizes the Spring Security and Jakarta role-check families.
//! Callers apply most-specific-wins: method-level over class-level.

use super::types::{AuthType, SecurityRule};
use crate::parsers::types::Annotation;

/// Extract a security rule from a class or method annotation set.
/// Returns `None` when no recognized annotation is present.
pub fn from_annotations(annotations: &[Annotation]) -> Option<SecurityRule> {
    for annotation in annotations {
        let rule = match annotation.name.as_str() {
            "PreAuthorize" => {
                let expression = annotation.string_arg("value");
                let roles = expression
                    .as_deref()
                    .map(roles_in_expression)
                    .unwrap_or_default();
                SecurityRule {
                    auth_type: Some(AuthType::PreAuthorize),
                    expression,
                    roles,
                    is_public: false,
                }
            }
            "Secured" => SecurityRule {
                auth_type: Some(AuthType::Secured),
                expression: None,
                roles: role_list(annotation),
                is_public: false,
            },
            "RolesAllowed" => SecurityRule {
                auth_type: Some(AuthType::RolesAllowed),
                expression: None,
                roles: role_list(annotation),
                is_public: false,
            },
            "PermitAll" => SecurityRule {
                auth_type: Some(AuthType::PermitAll),
                expression: None,
                roles: Vec::new(),
                is_public: true,
            },
            "DenyAll" => SecurityRule {
                auth_type: Some(AuthType::DenyAll),
                expression: None,
                roles: Vec::new(),
                is_public: false,
            },
            _ => continue,
        };
        return Some(rule);
    }
    None
}

fn role_list(annotation: &Annotation) -> Vec<String> {
    annotation
        .arg("value")
        .map(|v| v.string_values())
        .unwrap_or_default()
}

/// Pull role names out of a SpEL expression like
/// `hasRole('ADMIN') or hasAuthority('payments:write')`: the
/// single-quoted tokens, only when a role/authority check is present.
fn roles_in_expression(expression: &str) -> Vec<String> {
    if !expression.contains("hasRole") && !expression.contains("hasAuthority") {
        return Vec::new();
    }
    let mut roles = Vec::new();
    let mut rest = expression;
    while let Some(start) = rest.find('\'') {
        let after = &rest[start + 1..];
        match after.find('\'') {
            Some(end) => {
                roles.push(after[..end].to_string());
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    roles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::types::{AnnotationArg, AnnotationValue};
    use smallvec::smallvec;

    fn annotation(name: &str, value: AnnotationValue) -> Annotation {
        Annotation {
            name: name.to_string(),
            args: smallvec![AnnotationArg {
                name: "value".to_string(),
                value,
            }],
        }
    }

    #[test]
    fn pre_authorize_extracts_roles() {
        let anns = vec![annotation(
            "PreAuthorize",
            AnnotationValue::Str("hasRole('ADMIN') or hasRole('AUDITOR')".into()),
        )];
        let rule = from_annotations(&anns).unwrap();
        assert_eq!(rule.auth_type, Some(AuthType::PreAuthorize));
        assert!(!rule.is_public);
        assert_eq!(rule.roles, ["ADMIN", "AUDITOR"]);
    }

    #[test]
    fn pre_authorize_without_role_check_keeps_expression_only() {
        let anns = vec![annotation(
            "PreAuthorize",
            AnnotationValue::Str("isAuthenticated()".into()),
        )];
        let rule = from_annotations(&anns).unwrap();
        assert!(rule.roles.is_empty());
        assert_eq!(rule.expression.as_deref(), Some("isAuthenticated()"));
    }

    #[test]
    fn secured_accepts_array_values() {
        let anns = vec![annotation(
            "Secured",
            AnnotationValue::Array(vec![
                AnnotationValue::Str("ROLE_USER".into()),
                AnnotationValue::Str("ROLE_ADMIN".into()),
            ]),
        )];
        let rule = from_annotations(&anns).unwrap();
        assert_eq!(rule.roles, ["ROLE_USER", "ROLE_ADMIN"]);
    }

    #[test]
    fn permit_all_is_public() {
        let anns = vec![Annotation {
            name: "PermitAll".to_string(),
            args: smallvec![],
        }];
        assert!(from_annotations(&anns).unwrap().is_public);
    }

    #[test]
    fn unrecognized_annotations_yield_none() {
        let anns = vec![Annotation {
            name: "Transactional".to_string(),
            args: smallvec![],
        }];
        assert!(from_annotations(&anns).is_none());
    }
}
