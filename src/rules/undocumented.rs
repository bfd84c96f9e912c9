//! Undocumented-variable detection rule.
//!
//! A variable that is wired up and used but absent from the example template
//! is invisible to new contributors. Only enforced when the scope actually
//! has a template file.

use std::collections::BTreeMap;

use crate::{
    core::{DeclaredVariables, ExampleSet, UsageRecord},
    issues::{Severity, UndocumentedVarIssue},
};

/// Check for used and declared variables missing from the example template.
///
/// With fallback detection enabled, guarded usage downgrades the issue to
/// informational; bare usage stays a warning.
pub fn check_undocumented_vars(
    usage: &BTreeMap<String, UsageRecord>,
    declared: &DeclaredVariables,
    example: &ExampleSet,
    detect_fallbacks: bool,
) -> Vec<UndocumentedVarIssue> {
    if !example.found {
        return Vec::new();
    }

    usage
        .iter()
        .filter(|(name, _)| declared.contains_key(*name) && !example.names.contains(*name))
        .map(|(name, record)| {
            let severity = if detect_fallbacks && record.has_fallback {
                Severity::Info
            } else {
                Severity::Warning
            };
            UndocumentedVarIssue {
                name: name.clone(),
                severity,
                locations: record.locations.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;

    use crate::core::DeclaredVariable;
    use crate::rules::undocumented::*;

    fn usage_map(entries: &[(&str, bool)]) -> BTreeMap<String, UsageRecord> {
        entries
            .iter()
            .map(|(name, has_fallback)| {
                (
                    name.to_string(),
                    UsageRecord {
                        name: name.to_string(),
                        locations: vec!["./a.js".to_string()],
                        has_fallback: *has_fallback,
                    },
                )
            })
            .collect()
    }

    fn declared_map(names: &[&str]) -> DeclaredVariables {
        names
            .iter()
            .map(|name| {
                (
                    name.to_string(),
                    DeclaredVariable {
                        name: name.to_string(),
                        raw_value: "x".to_string(),
                        line_number: Some(1),
                        source: "./.env".to_string(),
                        is_external_reference: false,
                    },
                )
            })
            .collect()
    }

    fn example_of(names: &[&str]) -> ExampleSet {
        ExampleSet {
            names: names.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            found: true,
        }
    }

    #[test]
    fn test_documented_var_not_reported() {
        let issues = check_undocumented_vars(
            &usage_map(&[("FOO", false)]),
            &declared_map(&["FOO"]),
            &example_of(&["FOO"]),
            true,
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_bare_undocumented_is_warning() {
        let issues = check_undocumented_vars(
            &usage_map(&[("FOO", false)]),
            &declared_map(&["FOO"]),
            &example_of(&[]),
            true,
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_guarded_undocumented_is_info() {
        let issues = check_undocumented_vars(
            &usage_map(&[("FOO", true)]),
            &declared_map(&["FOO"]),
            &example_of(&[]),
            true,
        );
        assert_eq!(issues[0].severity, Severity::Info);
    }

    #[test]
    fn test_guarded_is_warning_without_fallback_detection() {
        let issues = check_undocumented_vars(
            &usage_map(&[("FOO", true)]),
            &declared_map(&["FOO"]),
            &example_of(&[]),
            false,
        );
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_undeclared_vars_are_not_this_rules_business() {
        // Used but undeclared names belong to the missing rule.
        let issues = check_undocumented_vars(
            &usage_map(&[("FOO", false)]),
            &declared_map(&[]),
            &example_of(&[]),
            true,
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_absent_template_disables_rule() {
        let issues = check_undocumented_vars(
            &usage_map(&[("FOO", false)]),
            &declared_map(&["FOO"]),
            &ExampleSet::default(),
            true,
        );
        assert!(issues.is_empty());
    }
}
