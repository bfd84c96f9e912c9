//! Declared-but-unused detection rule.
//!
//! A declaration nothing reads is dead weight at best and a leftover secret
//! at worst, but it breaks nothing at runtime, so this is informational.

use std::collections::BTreeMap;

use crate::{
    core::{DeclaredVariables, UsageRecord},
    issues::UnusedVarIssue,
};

/// Check for variables declared in the scope but never referenced by any of
/// its source files.
pub fn check_unused_vars(
    usage: &BTreeMap<String, UsageRecord>,
    declared: &DeclaredVariables,
) -> Vec<UnusedVarIssue> {
    declared
        .iter()
        .filter(|(name, _)| !usage.contains_key(*name))
        .map(|(_, var)| UnusedVarIssue {
            name: var.name.clone(),
            source: var.source.clone(),
            line_number: var.line_number,
            is_external_reference: var.is_external_reference,
        })
        .collect()
}
