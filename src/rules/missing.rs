//! Used-but-undeclared detection rule.
//!
//! A variable read in code with no declaration in the scope will be absent
//! at runtime. Severity depends on whether the usage tolerates absence.

use std::collections::BTreeMap;

use crate::{
    core::{DeclaredVariables, UsageRecord},
    issues::{MissingVarIssue, Severity},
};

/// Check for variables used in code but declared nowhere in the scope.
///
/// When `detect_fallbacks` is enabled, a variable whose every usage site has
/// a safe fallback is downgraded to a warning; otherwise everything is an
/// error.
pub fn check_missing_vars(
    usage: &BTreeMap<String, UsageRecord>,
    declared: &DeclaredVariables,
    detect_fallbacks: bool,
) -> Vec<MissingVarIssue> {
    usage
        .iter()
        .filter(|(name, _)| !declared.contains_key(*name))
        .map(|(name, record)| {
            let severity = if detect_fallbacks && record.has_fallback {
                Severity::Warning
            } else {
                Severity::Error
            };
            MissingVarIssue {
                name: name.clone(),
                severity,
                has_fallback: record.has_fallback,
                locations: record.locations.clone(),
            }
        })
        .collect()
}
