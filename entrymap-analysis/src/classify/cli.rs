//! CLI fallback: conventional `public static void main(String[])`.
//!
//! Class-scoped: applied only when no method-scoped rule claimed the
//! class, independent of annotations.

use super::types::{EntryPoint, EntryPointDetails, IntegrationType};
use crate::parsers::types::{DeclKind, MethodDecl, TypeDecl};

/// Emit a CLI entry point for the class's main method, if it has one.
pub fn extract_main(class: &TypeDecl, file: &str) -> Option<EntryPoint> {
    if class.kind != DeclKind::Class {
        return None;
    }
    let main = class.methods.iter().find(|m| is_entry_main(m))?;

    Some(EntryPoint {
        integration_type: IntegrationType::Cli,
        declaring_class: class.qualified_name.clone(),
        method_name: main.name.clone(),
        file: file.to_string(),
        line: main.line,
        details: EntryPointDetails::Cli,
        security: None,
        request_type: None,
        response_type: None,
        request_schema: None,
        response_schema: None,
        incomplete: false,
    })
}

fn is_entry_main(method: &MethodDecl) -> bool {
    method.name == "main"
        && method.modifiers.iter().any(|m| m == "public")
        && method.modifiers.iter().any(|m| m == "static")
        && method.parameters.len() == 1
        && method.parameters[0].type_ref.name == "String"
        && method.parameters[0].type_ref.array_dims >= 1
}
