//! Canonical parse output and supporting types.
//!
//! This is the single source of truth for what the loader extracts from a
//! Java file. Every downstream stage (index, classifier, resolver)
//! consumes these structs; nothing else re-parses source text.

use entrymap_core::types::collections::{SmallVec2, SmallVec4};
use serde::{Deserialize, Serialize};

/// One parsed file. Immutable after the loader returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceUnit {
    pub path: String,
    pub package: Option<String>,
    pub imports: Vec<String>,
    pub declarations: Vec<TypeDecl>,
    pub parse_success: bool,
    pub content_hash: u64,
    pub error_count: u32,
}

/// Kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclKind {
    Class,
    Interface,
    Enum,
    Record,
}

/// A class, interface, enum, or record declaration.
///
/// Methods and fields are stored inside their declaring type; the
/// cross-file [`crate::index::DeclarationIndex`] is a flat table keyed by
/// qualified name, so there are no back-pointers to manage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    pub simple_name: String,
    pub qualified_name: String,
    pub kind: DeclKind,
    pub annotations: Vec<Annotation>,
    pub modifiers: SmallVec4<String>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    /// Record components, for `record` declarations.
    pub components: Vec<Parameter>,
    pub line: u32,
}

/// A method declaration inside a type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    pub annotations: Vec<Annotation>,
    pub modifiers: SmallVec4<String>,
    pub parameters: SmallVec4<Parameter>,
    pub return_type: Option<TypeRef>,
    /// Ordered method invocations in the body, receiver-flattened.
    /// Used for best-effort batch builder-chain extraction only.
    pub invocations: Vec<Invocation>,
    pub line: u32,
}

/// A field declaration (one per declarator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub type_ref: TypeRef,
    pub annotations: Vec<Annotation>,
    /// Initializer text, quotes stripped for string literals.
    pub default_value: Option<String>,
}

/// A formal parameter (method parameter or record component).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_ref: TypeRef,
    pub annotations: Vec<Annotation>,
}

/// A type reference as written in source, generics preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    pub type_args: Vec<TypeRef>,
    pub array_dims: u8,
}

impl TypeRef {
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_args: Vec::new(),
            array_dims: 0,
        }
    }

    /// Rendered form, e.g. `List<Customer>` or `byte[]`.
    pub fn display(&self) -> String {
        let mut s = self.name.clone();
        if !self.type_args.is_empty() {
            let args: Vec<String> = self.type_args.iter().map(|a| a.display()).collect();
            s.push('<');
            s.push_str(&args.join(", "));
            s.push('>');
        }
        for _ in 0..self.array_dims {
            s.push_str("[]");
        }
        s
    }
}

/// One annotation occurrence, e.g. `@RequestMapping(value = "/api")`.
///
/// A single unnamed argument is normalized to the attribute name `value`,
/// matching Java's implicit-element convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    pub args: SmallVec2<AnnotationArg>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationArg {
    pub name: String,
    pub value: AnnotationValue,
}

/// Literal value inside an annotation argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationValue {
    Str(String),
    Number(f64),
    Bool(bool),
    /// A bare reference such as `RequestMethod.POST` or a constant name.
    Ident(String),
    Array(Vec<AnnotationValue>),
}

impl AnnotationValue {
    /// The value as a string, if it carries one (string literal or ident).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) | Self::Ident(s) => Some(s),
            _ => None,
        }
    }

    /// Flatten to string values: a scalar yields one, an array yields all.
    pub fn string_values(&self) -> Vec<String> {
        match self {
            Self::Str(s) | Self::Ident(s) => vec![s.clone()],
            Self::Number(n) => vec![format_number(*n)],
            Self::Bool(b) => vec![b.to_string()],
            Self::Array(items) => items.iter().flat_map(|v| v.string_values()).collect(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl Annotation {
    /// Look up an attribute by name.
    pub fn arg(&self, name: &str) -> Option<&AnnotationValue> {
        self.args.iter().find(|a| a.name == name).map(|a| &a.value)
    }

    /// First string value of the named attribute.
    pub fn string_arg(&self, name: &str) -> Option<String> {
        self.arg(name).map(|v| v.string_values()).and_then(|mut v| {
            if v.is_empty() {
                None
            } else {
                Some(v.remove(0))
            }
        })
    }

    /// First string value of any of the named attributes, in order.
    pub fn string_arg_any(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|n| self.string_arg(n))
    }
}

/// A method invocation inside a method body, in source order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invocation {
    pub name: String,
    /// Identifier / nested-invocation / string-literal arguments, flattened
    /// to their textual names.
    pub args: Vec<String>,
}

/// Find an annotation by simple name in a slice.
pub fn find_annotation<'a>(annotations: &'a [Annotation], name: &str) -> Option<&'a Annotation> {
    annotations.iter().find(|a| a.name == name)
}

/// True when any of the named annotations is present.
pub fn has_annotation(annotations: &[Annotation], names: &[&str]) -> bool {
    annotations.iter().any(|a| names.contains(&a.name.as_str()))
}
