//! Java syntax loader.
//!
//! Walks a tree-sitter parse of a Java compilation unit into a
//! [`SourceUnit`]. Never panics past its boundary: grammar failures and
//! syntax errors become a `parse_success = false` unit plus a diagnostic,
//! and the run continues with the remaining files.

use entrymap_core::errors::ParseError;
use entrymap_core::{Diagnostic, Stage};
use tree_sitter::{Node, Parser};
use xxhash_rust::xxh3::xxh3_64;

use super::types::{
    Annotation, AnnotationArg, AnnotationValue, DeclKind, FieldDecl, Invocation, MethodDecl,
    Parameter, SourceUnit, TypeDecl, TypeRef,
};

pub struct JavaLoader {
    parser: Parser,
}

impl JavaLoader {
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|e| ParseError::GrammarLoad {
                message: e.to_string(),
            })?;
        Ok(Self { parser })
    }

    /// Parse one file. Returns the unit and, on failure, a load diagnostic.
    pub fn load(&mut self, path: &str, source: &str) -> (SourceUnit, Option<Diagnostic>) {
        let content_hash = xxh3_64(source.as_bytes());
        let failed = |message: String, line: Option<u32>| {
            let mut diag = Diagnostic::new(Stage::Load, message).with_file(path);
            if let Some(line) = line {
                diag = diag.with_line(line);
            }
            (
                SourceUnit {
                    path: path.to_string(),
                    package: None,
                    imports: Vec::new(),
                    declarations: Vec::new(),
                    parse_success: false,
                    content_hash,
                    error_count: 0,
                },
                Some(diag),
            )
        };

        let tree = match self.parser.parse(source, None) {
            Some(tree) => tree,
            None => {
                let error = ParseError::NoTree {
                    path: path.to_string(),
                };
                return failed(error.to_string(), None);
            }
        };

        let root = tree.root_node();
        let src = source.as_bytes();

        if root.has_error() {
            let (error_count, first_line) = count_errors(root);
            let error = ParseError::SyntaxErrors {
                path: path.to_string(),
                error_count,
                line: first_line,
            };
            let (mut unit, diag) = failed(error.to_string(), Some(first_line));
            unit.error_count = error_count;
            return (unit, diag);
        }

        let package = extract_package(root, src);
        let imports = extract_imports(root, src);
        let mut declarations = Vec::new();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            collect_type_decls(child, src, package.as_deref(), None, &mut declarations);
        }

        (
            SourceUnit {
                path: path.to_string(),
                package,
                imports,
                declarations,
                parse_success: true,
                content_hash,
                error_count: 0,
            },
            None,
        )
    }
}

/// Count ERROR / MISSING nodes and find the first offending line (1-based).
fn count_errors(root: Node) -> (u32, u32) {
    let mut count = 0u32;
    let mut first_line = u32::MAX;
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            count += 1;
            first_line = first_line.min(node.start_position().row as u32 + 1);
        }
        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }
    (count, if first_line == u32::MAX { 1 } else { first_line })
}

fn text(node: Node, src: &[u8]) -> String {
    node.utf8_text(src).unwrap_or("").to_string()
}

fn extract_package(root: Node, src: &[u8]) -> Option<String> {
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() == "package_declaration" {
            let mut inner = child.walk();
            for part in child.named_children(&mut inner) {
                if matches!(part.kind(), "scoped_identifier" | "identifier") {
                    return Some(text(part, src));
                }
            }
        }
    }
    None
}

fn extract_imports(root: Node, src: &[u8]) -> Vec<String> {
    let mut imports = Vec::new();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() == "import_declaration" {
            let mut inner = child.walk();
            for part in child.named_children(&mut inner) {
                if matches!(part.kind(), "scoped_identifier" | "identifier") {
                    imports.push(text(part, src));
                }
            }
        }
    }
    imports
}

/// Collect a type declaration (and any nested types, flattened) into `out`.
fn collect_type_decls(
    node: Node,
    src: &[u8],
    package: Option<&str>,
    enclosing: Option<&str>,
    out: &mut Vec<TypeDecl>,
) {
    let kind = match node.kind() {
        "class_declaration" => DeclKind::Class,
        "interface_declaration" => DeclKind::Interface,
        "enum_declaration" => DeclKind::Enum,
        "record_declaration" => DeclKind::Record,
        _ => return,
    };

    let simple_name = node
        .child_by_field_name("name")
        .map(|n| text(n, src))
        .unwrap_or_default();
    if simple_name.is_empty() {
        return;
    }

    // Nested types are qualified through their enclosing type.
    let local_name = match enclosing {
        Some(outer) => format!("{outer}.{simple_name}"),
        None => simple_name.clone(),
    };
    let qualified_name = match package {
        Some(pkg) => format!("{pkg}.{local_name}"),
        None => local_name.clone(),
    };

    let (modifiers, annotations) = extract_modifiers(node, src);

    let mut decl = TypeDecl {
        simple_name,
        qualified_name,
        kind,
        annotations,
        modifiers,
        fields: Vec::new(),
        methods: Vec::new(),
        components: Vec::new(),
        line: node.start_position().row as u32 + 1,
    };

    if kind == DeclKind::Record {
        if let Some(params) = node.child_by_field_name("parameters") {
            decl.components = extract_parameters(params, src).into_vec();
        }
    }

    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "method_declaration" => decl.methods.push(extract_method(member, src)),
                "field_declaration" => decl.fields.extend(extract_fields(member, src)),
                "class_declaration" | "interface_declaration" | "enum_declaration"
                | "record_declaration" => {
                    collect_type_decls(member, src, package, Some(&decl.qualified_local(package)), out);
                }
                _ => {}
            }
        }
    }

    out.push(decl);
}

impl TypeDecl {
    /// Name relative to the package, used to qualify nested types.
    fn qualified_local(&self, package: Option<&str>) -> String {
        match package {
            Some(pkg) => self
                .qualified_name
                .strip_prefix(pkg)
                .map(|rest| rest.trim_start_matches('.').to_string())
                .unwrap_or_else(|| self.simple_name.clone()),
            None => self.qualified_name.clone(),
        }
    }
}

/// Split a `modifiers` child into plain modifiers and annotations.
fn extract_modifiers(
    node: Node,
    src: &[u8],
) -> (
    smallvec::SmallVec<[String; 4]>,
    Vec<Annotation>,
) {
    let mut modifiers = smallvec::SmallVec::new();
    let mut annotations = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "modifiers" {
            continue;
        }
        let mut inner = child.walk();
        for item in child.children(&mut inner) {
            match item.kind() {
                "marker_annotation" | "annotation" => {
                    annotations.push(extract_annotation(item, src));
                }
                _ => {
                    let t = text(item, src);
                    if !t.is_empty() {
                        modifiers.push(t);
                    }
                }
            }
        }
    }
    (modifiers, annotations)
}

fn extract_annotation(node: Node, src: &[u8]) -> Annotation {
    let name = node
        .child_by_field_name("name")
        .map(|n| {
            // `@org.springframework.web.bind.annotation.GetMapping`:
            // keep the simple name, matching import-free recognition.
            let full = text(n, src);
            full.rsplit('.').next().unwrap_or(&full).to_string()
        })
        .unwrap_or_default();

    let mut args = smallvec::SmallVec::new();
    if let Some(arg_list) = node.child_by_field_name("arguments") {
        let mut cursor = arg_list.walk();
        for arg in arg_list.named_children(&mut cursor) {
            if arg.kind() == "element_value_pair" {
                let key = arg
                    .child_by_field_name("key")
                    .map(|k| text(k, src))
                    .unwrap_or_default();
                if let Some(value) = arg.child_by_field_name("value") {
                    args.push(AnnotationArg {
                        name: key,
                        value: extract_value(value, src),
                    });
                }
            } else {
                // Single unnamed argument: Java's implicit `value` element.
                args.push(AnnotationArg {
                    name: "value".to_string(),
                    value: extract_value(arg, src),
                });
            }
        }
    }

    Annotation { name, args }
}

fn extract_value(node: Node, src: &[u8]) -> AnnotationValue {
    match node.kind() {
        "string_literal" | "text_block" => AnnotationValue::Str(strip_quotes(&text(node, src))),
        "decimal_integer_literal"
        | "hex_integer_literal"
        | "octal_integer_literal"
        | "binary_integer_literal"
        | "decimal_floating_point_literal" => {
            let raw = text(node, src);
            let cleaned: String = raw
                .chars()
                .filter(|c| !matches!(c, '_' | 'l' | 'L' | 'f' | 'F' | 'd' | 'D'))
                .collect();
            match cleaned.parse::<f64>() {
                Ok(n) => AnnotationValue::Number(n),
                Err(_) => AnnotationValue::Ident(raw),
            }
        }
        "true" => AnnotationValue::Bool(true),
        "false" => AnnotationValue::Bool(false),
        "element_value_array_initializer" => {
            let mut items = Vec::new();
            let mut cursor = node.walk();
            for item in node.named_children(&mut cursor) {
                items.push(extract_value(item, src));
            }
            AnnotationValue::Array(items)
        }
        "annotation" | "marker_annotation" => {
            // Nested annotation literal: keep its textual form.
            AnnotationValue::Ident(text(node, src))
        }
        _ => AnnotationValue::Ident(text(node, src)),
    }
}

fn strip_quotes(raw: &str) -> String {
    let s = raw.trim();
    let s = s
        .strip_prefix("\"\"\"")
        .and_then(|r| r.strip_suffix("\"\"\""))
        .unwrap_or(s);
    s.strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .unwrap_or(s)
        .to_string()
}

fn extract_method(node: Node, src: &[u8]) -> MethodDecl {
    let (modifiers, annotations) = extract_modifiers(node, src);
    let parameters = node
        .child_by_field_name("parameters")
        .map(|p| extract_parameters(p, src))
        .unwrap_or_default();
    let return_type = node
        .child_by_field_name("type")
        .map(|t| extract_type_ref(t, src));

    let mut invocations = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        collect_invocations(body, src, &mut invocations);
    }

    MethodDecl {
        name: node
            .child_by_field_name("name")
            .map(|n| text(n, src))
            .unwrap_or_default(),
        annotations,
        modifiers,
        parameters,
        return_type,
        invocations,
        line: node.start_position().row as u32 + 1,
    }
}

fn extract_parameters(params: Node, src: &[u8]) -> smallvec::SmallVec<[Parameter; 4]> {
    let mut out = smallvec::SmallVec::new();
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        if !matches!(param.kind(), "formal_parameter" | "spread_parameter") {
            continue;
        }
        let (_mods, annotations) = extract_modifiers(param, src);
        let type_ref = param
            .child_by_field_name("type")
            .map(|t| extract_type_ref(t, src))
            .unwrap_or_else(|| TypeRef::simple("Object"));
        let name = param
            .child_by_field_name("name")
            .map(|n| text(n, src))
            .unwrap_or_default();
        out.push(Parameter {
            name,
            type_ref,
            annotations,
        });
    }
    out
}

/// One `FieldDecl` per declarator: `int a, b;` yields two.
fn extract_fields(node: Node, src: &[u8]) -> Vec<FieldDecl> {
    let (_mods, annotations) = extract_modifiers(node, src);
    let type_ref = node
        .child_by_field_name("type")
        .map(|t| extract_type_ref(t, src))
        .unwrap_or_else(|| TypeRef::simple("Object"));

    let mut fields = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "variable_declarator" {
            if let Some(name) = child.child_by_field_name("name") {
                let default_value = child
                    .child_by_field_name("value")
                    .map(|v| literal_text(v, src));
                fields.push(FieldDecl {
                    name: text(name, src),
                    type_ref: type_ref.clone(),
                    annotations: annotations.clone(),
                    default_value,
                });
            }
        }
    }
    fields
}

/// Textual form of an initializer; string literals lose their quotes.
fn literal_text(node: Node, src: &[u8]) -> String {
    match node.kind() {
        "string_literal" | "text_block" => strip_quotes(&text(node, src)),
        _ => text(node, src),
    }
}

fn extract_type_ref(node: Node, src: &[u8]) -> TypeRef {
    match node.kind() {
        "generic_type" => {
            let mut name = String::new();
            let mut type_args = Vec::new();
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                match child.kind() {
                    "type_identifier" | "scoped_type_identifier" => {
                        name = simple_type_name(&text(child, src));
                    }
                    "type_arguments" => {
                        let mut inner = child.walk();
                        for arg in child.named_children(&mut inner) {
                            if arg.kind() == "wildcard" {
                                type_args.push(TypeRef::simple("?"));
                            } else {
                                type_args.push(extract_type_ref(arg, src));
                            }
                        }
                    }
                    _ => {}
                }
            }
            TypeRef {
                name,
                type_args,
                array_dims: 0,
            }
        }
        "array_type" => {
            let mut inner = node
                .child_by_field_name("element")
                .map(|e| extract_type_ref(e, src))
                .unwrap_or_else(|| TypeRef::simple("Object"));
            inner.array_dims = inner.array_dims.saturating_add(1);
            inner
        }
        "scoped_type_identifier" => TypeRef::simple(simple_type_name(&text(node, src))),
        _ => TypeRef::simple(text(node, src)),
    }
}

/// `java.math.BigDecimal` -> `BigDecimal`, matching simple-name resolution.
fn simple_type_name(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_string()
}

/// Collect method invocations, flattening receivers so chained calls
/// appear in written order: `a().b().c()` -> `a, b, c`. Arguments are kept
/// as identifier / callee / string-literal names only; the batch rule
/// reads builder chains out of this.
fn collect_invocations(node: Node, src: &[u8], out: &mut Vec<Invocation>) {
    if node.kind() == "method_invocation" {
        if let Some(object) = node.child_by_field_name("object") {
            collect_invocations(object, src, out);
        }
        let name = node
            .child_by_field_name("name")
            .map(|n| text(n, src))
            .unwrap_or_default();
        let mut args = Vec::new();
        if let Some(arg_list) = node.child_by_field_name("arguments") {
            let mut inner = arg_list.walk();
            for arg in arg_list.named_children(&mut inner) {
                match arg.kind() {
                    "identifier" => args.push(text(arg, src)),
                    "string_literal" => args.push(strip_quotes(&text(arg, src))),
                    "method_invocation" => {
                        if let Some(n) = arg.child_by_field_name("name") {
                            args.push(text(n, src));
                        }
                    }
                    _ => {}
                }
            }
        }
        out.push(Invocation { name, args });
    } else {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            collect_invocations(child, src, out);
        }
    }
}
