//! Usage types produced by the extraction phase.
//!
//! A [`FileUsage`] is what the extractor returns for one source file: each
//! referenced variable name mapped to whether any occurrence in that file is
//! guarded. [`UsageRecord`] is the per-scope aggregate, merged file by file
//! in a deterministic order.

use std::collections::BTreeMap;

/// One environment variable reference in one file.
///
/// Multiple occurrences of the same name within a file collapse to a single
/// reference whose `guarded` flag is the OR of all occurrences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    pub name: String,
    /// True if at least one occurrence has a fallback, default, optional
    /// chain, or conditional guard.
    pub guarded: bool,
}

/// Per-file extraction result: variable name → guarded flag.
pub type FileUsage = BTreeMap<String, bool>;

/// Aggregate of a variable's references across all files in a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRecord {
    pub name: String,
    /// Relative file paths referencing this variable, in first-seen order.
    pub locations: Vec<String>,
    /// OR of the contributing files' guardedness. Monotonic: once true it
    /// never goes back to false as more files are merged in.
    pub has_fallback: bool,
}

impl UsageRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locations: Vec::new(),
            has_fallback: false,
        }
    }

    /// Merge one file's collapsed reference into this record.
    pub fn merge_reference(&mut self, file_path: &str, reference: &VariableReference) {
        if !self.locations.iter().any(|l| l == file_path) {
            self.locations.push(file_path.to_string());
        }
        self.has_fallback |= reference.guarded;
    }
}

/// Merge one file's extraction result into a scope-level usage map.
///
/// Callers must invoke this in a stable file order so `locations` is
/// reproducible across runs.
pub fn merge_file_usage(
    records: &mut BTreeMap<String, UsageRecord>,
    file_path: &str,
    usage: &FileUsage,
) {
    for (name, guarded) in usage {
        let reference = VariableReference {
            name: name.clone(),
            guarded: *guarded,
        };
        records
            .entry(name.clone())
            .or_insert_with(|| UsageRecord::new(name.clone()))
            .merge_reference(file_path, &reference);
    }
}
