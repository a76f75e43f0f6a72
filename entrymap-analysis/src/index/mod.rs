//! Declaration index: cross-file lookup from type name to declaration.
//!
//! Built once after all loader tasks complete; read-only afterwards, so
//! the classifier and resolver can share it across threads without
//! locking. Flat table keyed by qualified name (arena-style), with a
//! secondary simple-name table for names that are unambiguous across the
//! whole tree.

use entrymap_core::types::collections::FxHashMap;
use entrymap_core::{Diagnostic, Stage};

use crate::parsers::types::{SourceUnit, TypeDecl};

#[derive(Debug, Default)]
pub struct DeclarationIndex {
    by_qualified: FxHashMap<String, TypeDecl>,
    /// Simple name -> qualified name; `None` marks an ambiguous simple name.
    by_simple: FxHashMap<String, Option<String>>,
}

impl DeclarationIndex {
    /// Build the index over all successfully loaded units.
    ///
    /// Collision policy: the first declaration in file-discovery order
    /// wins and a diagnostic records the duplicate, so resolution is
    /// deterministic per run.
    pub fn build(units: &[SourceUnit]) -> (Self, Vec<Diagnostic>) {
        let mut index = Self::default();
        let mut diagnostics = Vec::new();

        for unit in units.iter().filter(|u| u.parse_success) {
            for decl in &unit.declarations {
                if index.by_qualified.contains_key(&decl.qualified_name) {
                    diagnostics.push(
                        Diagnostic::new(
                            Stage::Index,
                            format!(
                                "duplicate declaration of {}, keeping the first occurrence",
                                decl.qualified_name
                            ),
                        )
                        .with_file(unit.path.clone())
                        .with_line(decl.line),
                    );
                    continue;
                }

                index
                    .by_simple
                    .entry(decl.simple_name.clone())
                    .and_modify(|entry| *entry = None)
                    .or_insert_with(|| Some(decl.qualified_name.clone()));
                index
                    .by_qualified
                    .insert(decl.qualified_name.clone(), decl.clone());
            }
        }

        (index, diagnostics)
    }

    /// Resolve a simple or qualified type name to its declaration.
    /// Ambiguous simple names do not resolve.
    pub fn resolve(&self, name: &str) -> Option<&TypeDecl> {
        if let Some(decl) = self.by_qualified.get(name) {
            return Some(decl);
        }
        match self.by_simple.get(name) {
            Some(Some(qualified)) => self.by_qualified.get(qualified),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.by_qualified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_qualified.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::JavaLoader;

    fn unit(path: &str, source: &str) -> SourceUnit {
        let mut loader = JavaLoader::new().unwrap();
        loader.load(path, source).0
    }

    #[test]
    fn resolves_simple_and_qualified_names() {
        let units = vec![unit(
            "A.java",
            "package com.acme; public class Account {}",
        )];
        let (index, diags) = DeclarationIndex::build(&units);
        assert!(diags.is_empty());
        assert!(index.resolve("Account").is_some());
        assert!(index.resolve("com.acme.Account").is_some());
        assert!(index.resolve("Missing").is_none());
    }

    #[test]
    fn duplicate_qualified_name_keeps_first_and_records_diagnostic() {
        let units = vec![
            unit("A.java", "package p; public class Dup { int first; }"),
            unit("B.java", "package p; public class Dup { int second; }"),
        ];
        let (index, diags) = DeclarationIndex::build(&units);
        assert_eq!(diags.len(), 1);
        let kept = index.resolve("p.Dup").unwrap();
        assert_eq!(kept.fields[0].name, "first");
    }

    #[test]
    fn ambiguous_simple_name_does_not_resolve() {
        let units = vec![
            unit("A.java", "package a; public class Dto {}"),
            unit("B.java", "package b; public class Dto {}"),
        ];
        let (index, _) = DeclarationIndex::build(&units);
        assert!(index.resolve("Dto").is_none());
        assert!(index.resolve("a.Dto").is_some());
        assert!(index.resolve("b.Dto").is_some());
    }
}
