//! Definition collectors.
//!
//! Declared variables come from heterogeneous sources: flat `NAME=value`
//! files, structured deployment manifests, and human-facing template files.
//! Each source kind has its own parser producing the same uniform
//! [`DeclaredVariable`] / name-set shape; the scope resolver decides which
//! parser runs for which file.

use std::collections::BTreeMap;
use std::path::PathBuf;

pub mod dotenv;
pub mod manifest;
pub mod template;

/// A declaration source discovered in the project tree, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationSource {
    /// Flat `NAME=value` file (`.env`, `.env.local`, ...).
    Flat(PathBuf),
    /// Structured deployment manifest (`serverless.yml`).
    Manifest(PathBuf),
    /// Human-facing template (`.env.example`); contributes documented names
    /// only, never runtime declarations.
    Template(PathBuf),
}

impl DeclarationSource {
    pub fn path(&self) -> &PathBuf {
        match self {
            DeclarationSource::Flat(path)
            | DeclarationSource::Manifest(path)
            | DeclarationSource::Template(path) => path,
        }
    }
}

/// One declared variable, unified across source kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredVariable {
    pub name: String,
    /// The raw textual value as written in the source. Structured manifest
    /// expressions are stringified to their literal form, never dropped.
    pub raw_value: String,
    /// 1-based line number for flat files; absent for manifest entries.
    pub line_number: Option<usize>,
    /// Relative path of the declaring file.
    pub source: String,
    /// True when the value defers resolution to an external system (secrets
    /// store, parameter store, cross-stack output, ...).
    pub is_external_reference: bool,
}

/// Scope-level declaration map. First declaration wins; later ones for the
/// same name are ignored, never overwritten.
pub type DeclaredVariables = BTreeMap<String, DeclaredVariable>;

/// Merge `incoming` into `declared` with first-wins semantics.
pub fn merge_declarations(declared: &mut DeclaredVariables, incoming: DeclaredVariables) {
    for (name, var) in incoming {
        declared.entry(name).or_insert(var);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::core::collect::*;

    fn var(name: &str, value: &str, source: &str) -> DeclaredVariable {
        DeclaredVariable {
            name: name.to_string(),
            raw_value: value.to_string(),
            line_number: None,
            source: source.to_string(),
            is_external_reference: false,
        }
    }

    #[test]
    fn test_merge_first_wins() {
        let mut declared = DeclaredVariables::new();
        declared.insert("FOO".to_string(), var("FOO", "first", "./.env"));

        let mut incoming = DeclaredVariables::new();
        incoming.insert("FOO".to_string(), var("FOO", "second", "./.env.local"));
        incoming.insert("BAR".to_string(), var("BAR", "new", "./.env.local"));

        merge_declarations(&mut declared, incoming);

        assert_eq!(declared["FOO"].raw_value, "first");
        assert_eq!(declared["BAR"].raw_value, "new");
        assert_eq!(declared.len(), 2);
    }

    #[test]
    fn test_declaration_source_path() {
        let source = DeclarationSource::Flat(PathBuf::from("/p/.env"));
        assert_eq!(source.path(), &PathBuf::from("/p/.env"));
    }
}
