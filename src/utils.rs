//! Common utility functions shared across the codebase.

use std::sync::LazyLock;

use regex::Regex;

static VAR_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z_][A-Z0-9_]*$").expect("valid regex"));

static VAR_NAME_ANY_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)[A-Z_][A-Z0-9_]*$").expect("valid regex"));

/// Checks whether a name is a valid environment variable candidate.
///
/// Anything that does not match `^[A-Z_][A-Z0-9_]*$` is not treated as an
/// environment variable and is discarded at extraction time.
///
/// # Examples
///
/// ```
/// use envaudit::utils::is_valid_var_name;
///
/// assert!(is_valid_var_name("DATABASE_URL"));
/// assert!(is_valid_var_name("_PRIVATE"));
/// assert!(is_valid_var_name("S3_BUCKET_2"));
/// assert!(!is_valid_var_name("databaseUrl"));
/// assert!(!is_valid_var_name("2FA_SECRET"));
/// assert!(!is_valid_var_name(""));
/// ```
pub fn is_valid_var_name(name: &str) -> bool {
    VAR_NAME.is_match(name)
}

/// Checks whether a name is acceptable as a manifest environment key.
///
/// Deployment manifests are matched case-insensitively; the reconciliation
/// itself still compares names verbatim.
pub fn is_valid_manifest_key(name: &str) -> bool {
    VAR_NAME_ANY_CASE.is_match(name)
}

#[cfg(test)]
mod tests {
    use crate::utils::*;

    #[test]
    fn test_is_valid_var_name() {
        assert!(is_valid_var_name("FOO"));
        assert!(is_valid_var_name("FOO_BAR"));
        assert!(is_valid_var_name("_INTERNAL"));
        assert!(is_valid_var_name("V2"));

        assert!(!is_valid_var_name("foo"));
        assert!(!is_valid_var_name("Foo"));
        assert!(!is_valid_var_name("2FOO"));
        assert!(!is_valid_var_name("FOO-BAR"));
        assert!(!is_valid_var_name("FOO BAR"));
        assert!(!is_valid_var_name(""));
    }

    #[test]
    fn test_is_valid_manifest_key() {
        assert!(is_valid_manifest_key("FOO"));
        assert!(is_valid_manifest_key("foo_bar"));
        assert!(is_valid_manifest_key("Stage"));

        assert!(!is_valid_manifest_key("foo-bar"));
        assert!(!is_valid_manifest_key("2foo"));
        assert!(!is_valid_manifest_key(""));
    }
}
