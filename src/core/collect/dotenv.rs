//! Flat `NAME=value` declaration file parser.
//!
//! Comment and blank lines are skipped; an optional `export ` prefix is
//! tolerated. Invalid names are silently dropped per the naming invariant.

use crate::core::collect::{DeclaredVariable, DeclaredVariables};
use crate::utils::is_valid_var_name;

/// Parse the content of a flat declaration file.
///
/// `source` is the relative path recorded on each entry. Within one file the
/// first declaration of a name wins. Flat-file values are always literal,
/// never external references.
pub fn parse_dotenv(content: &str, source: &str) -> DeclaredVariables {
    let mut declared = DeclaredVariables::new();

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);

        let Some((name, value)) = trimmed.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if !is_valid_var_name(name) {
            continue;
        }

        declared
            .entry(name.to_string())
            .or_insert_with(|| DeclaredVariable {
                name: name.to_string(),
                raw_value: value.trim().to_string(),
                line_number: Some(index + 1),
                source: source.to_string(),
                is_external_reference: false,
            });
    }

    declared
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::core::collect::dotenv::*;

    #[test]
    fn test_parse_simple_pairs() {
        let declared = parse_dotenv("FOO=bar\nBAZ=qux\n", "./.env");
        assert_eq!(declared.len(), 2);
        assert_eq!(declared["FOO"].raw_value, "bar");
        assert_eq!(declared["FOO"].line_number, Some(1));
        assert_eq!(declared["BAZ"].line_number, Some(2));
        assert_eq!(declared["FOO"].source, "./.env");
        assert!(!declared["FOO"].is_external_reference);
    }

    #[test]
    fn test_skips_comments_and_blanks() {
        let content = "# database settings\n\nDATABASE_URL=postgres://localhost\n  # trailing comment\n";
        let declared = parse_dotenv(content, "./.env");
        assert_eq!(declared.len(), 1);
        assert_eq!(declared["DATABASE_URL"].line_number, Some(3));
    }

    #[test]
    fn test_export_prefix() {
        let declared = parse_dotenv("export API_KEY=secret\n", "./.env");
        assert_eq!(declared["API_KEY"].raw_value, "secret");
    }

    #[test]
    fn test_value_may_contain_equals() {
        let declared = parse_dotenv("CONN=host=db;port=5432\n", "./.env");
        assert_eq!(declared["CONN"].raw_value, "host=db;port=5432");
    }

    #[test]
    fn test_empty_value() {
        let declared = parse_dotenv("EMPTY=\n", "./.env");
        assert_eq!(declared["EMPTY"].raw_value, "");
    }

    #[test]
    fn test_invalid_names_dropped() {
        let content = "lowercase=nope\n1NUMBER=nope\nVALID=yes\nspaced name=nope\n";
        let declared = parse_dotenv(content, "./.env");
        assert_eq!(declared.len(), 1);
        assert!(declared.contains_key("VALID"));
    }

    #[test]
    fn test_first_declaration_wins_within_file() {
        let declared = parse_dotenv("FOO=first\nFOO=second\n", "./.env");
        assert_eq!(declared["FOO"].raw_value, "first");
        assert_eq!(declared["FOO"].line_number, Some(1));
    }

    #[test]
    fn test_lines_without_equals_ignored() {
        let declared = parse_dotenv("JUST_A_WORD\nOK=1\n", "./.env");
        assert_eq!(declared.len(), 1);
        assert!(declared.contains_key("OK"));
    }
}
