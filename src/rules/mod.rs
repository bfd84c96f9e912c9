//! Reconciliation engine.
//!
//! [`analyze`] diffs a scope's used variables against its declared variables
//! and classifies each discrepancy into a severity-tagged issue. It performs
//! no I/O and is a pure function: identical inputs always produce an
//! identical, identically ordered issue list.

use std::collections::BTreeMap;

use crate::{
    config::Config,
    core::{DeclaredVariables, ExampleSet, UsageRecord, registry},
    issues::Issue,
};

pub mod missing;
pub mod undocumented;
pub mod unused;

use missing::check_missing_vars;
use undocumented::check_undocumented_vars;
use unused::check_unused_vars;

/// Result of reconciling one scope.
#[derive(Debug, Default)]
pub struct AnalysisResult {
    /// Classified issues in deterministic order.
    pub issues: Vec<Issue>,
    /// Allowlisted names that were used but undeclared, grouped by category.
    /// Empty in strict mode.
    pub skipped: BTreeMap<String, Vec<String>>,
}

/// Category label for names suppressed via the configuration ignore list
/// rather than the static registry.
pub const IGNORED_BY_CONFIG: &str = "Ignored by config";

/// Reconcile one scope.
///
/// Names pass a two-tier allowlist first: the static known-variable registry
/// and the configured ignore list. In non-strict mode an allowlisted name
/// that is used but undeclared is suppressed from `missing` and surfaced in
/// the skipped list instead; in strict mode every name is evaluated. The
/// allowlist governs usage suppression only: declared-but-unused allowlisted
/// names are still reported as unused.
pub fn analyze(
    usage: &BTreeMap<String, UsageRecord>,
    declared: &DeclaredVariables,
    example: &ExampleSet,
    config: &Config,
) -> AnalysisResult {
    let mut skipped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut evaluated_usage: BTreeMap<String, UsageRecord> = BTreeMap::new();

    for (name, record) in usage {
        let category = allowlist_category(name, config);
        match category {
            Some(category) if !config.strict_mode => {
                // Only names that would otherwise be reported missing show
                // up in the skipped list; declared names need no suppression.
                if !declared.contains_key(name) {
                    skipped
                        .entry(category.to_string())
                        .or_default()
                        .push(name.clone());
                }
            }
            _ => {
                evaluated_usage.insert(name.clone(), record.clone());
            }
        }
    }

    let mut issues: Vec<Issue> = Vec::new();
    issues.extend(
        check_missing_vars(&evaluated_usage, declared, config.detect_fallbacks)
            .into_iter()
            .map(Issue::MissingVar),
    );
    issues.extend(
        check_unused_vars(usage, declared)
            .into_iter()
            .map(Issue::UnusedVar),
    );
    issues.extend(
        check_undocumented_vars(&evaluated_usage, declared, example, config.detect_fallbacks)
            .into_iter()
            .map(Issue::UndocumentedVar),
    );
    issues.sort();

    AnalysisResult { issues, skipped }
}

fn allowlist_category(name: &str, config: &Config) -> Option<&'static str> {
    registry::known_category(name).or_else(|| config.is_ignored(name).then_some(IGNORED_BY_CONFIG))
}
