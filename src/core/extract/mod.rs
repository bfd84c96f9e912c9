//! Reference extractor.
//!
//! Scans one unit of source text and returns the set of environment variable
//! names it references, each tagged guarded or bare. Detection is an ordered
//! list of independent pattern rules over the raw text, deliberately not a
//! language-aware parse: it trades some precision for zero build dependency.
//!
//! Rules that positively assert "guarded" run first; the merge only ever
//! upgrades bare → guarded, so a name's final state is monotonic within a
//! file no matter how many rules match it.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::usage::FileUsage;
use crate::utils::is_valid_var_name;

/// `if (process.env.FOO)` / `if (!process.env['FOO'])` — conditional guard.
static IF_CONDITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"if\s*\(\s*!?\s*process\.env(?:\.([A-Za-z_][A-Za-z0-9_]*)|\[\s*['"]([A-Za-z_][A-Za-z0-9_]*)['"]\s*\])"#,
    )
    .expect("valid regex")
});

/// `process.env?.FOO` — optional chaining on the container.
static OPTIONAL_CHAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"process\.env\?\.([A-Za-z_][A-Za-z0-9_]*)").expect("valid regex")
});

/// `process.env.FOO` — plain dotted access; guardedness decided by what
/// follows the match.
static DOTTED_ACCESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"process\.env\.([A-Za-z_][A-Za-z0-9_]*)").expect("valid regex")
});

/// `process.env['FOO']` / `process.env["FOO"]` — bracket subscript with a
/// quoted literal name.
static BRACKET_ACCESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"process\.env\[\s*['"]([A-Za-z_][A-Za-z0-9_]*)['"]\s*\]"#).expect("valid regex")
});

/// `const { FOO, BAR = 'x' } = process.env` — destructuring extraction.
static DESTRUCTURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:const|let|var)\s*\{([^}]*)\}\s*=\s*process\.env").expect("valid regex")
});

/// Extract all environment variable references from one source text.
///
/// Returns `name → guarded`. A name absent from the result is not referenced.
/// The function is pure and idempotent: the same text always yields the same
/// mapping.
pub fn extract_references(source: &str) -> FileUsage {
    let mut usage = FileUsage::new();

    // Guard-asserting rules first so the catch-all bare rules below can only
    // upgrade, never decide, an already-guarded name.
    for caps in IF_CONDITION.captures_iter(source) {
        if let Some(name) = caps.get(1).or_else(|| caps.get(2)) {
            mark(&mut usage, name.as_str(), true);
        }
    }

    for caps in OPTIONAL_CHAIN.captures_iter(source) {
        mark(&mut usage, &caps[1], true);
    }

    for caps in DESTRUCTURE.captures_iter(source) {
        for (name, has_default) in destructured_names(&caps[1]) {
            mark(&mut usage, &name, has_default);
        }
    }

    for caps in DOTTED_ACCESS.captures_iter(source) {
        let end = caps.get(0).expect("match").end();
        mark(&mut usage, &caps[1], has_fallback_operator(source, end));
    }

    for caps in BRACKET_ACCESS.captures_iter(source) {
        let end = caps.get(0).expect("match").end();
        mark(&mut usage, &caps[1], has_fallback_operator(source, end));
    }

    usage
}

/// Record a reference, upgrading bare → guarded but never the reverse.
fn mark(usage: &mut FileUsage, name: &str, guarded: bool) {
    if !is_valid_var_name(name) {
        return;
    }
    let entry = usage.entry(name.to_string()).or_insert(false);
    *entry |= guarded;
}

/// True when the text right after a reference starts with a fallback or
/// short-circuit operator: `||`, `??`, `&&`, or a ternary `?` (which also
/// covers `?.` optional chaining after the access).
fn has_fallback_operator(source: &str, end: usize) -> bool {
    let rest = source[end..].trim_start();
    rest.starts_with("||") || rest.starts_with("??") || rest.starts_with("&&") || rest.starts_with('?')
}

/// Parse the body of a destructuring pattern into `(name, has_default)`
/// pairs. Renames (`FOO: alias`) still read `FOO`; rest elements are not
/// variable names and are skipped.
fn destructured_names(body: &str) -> Vec<(String, bool)> {
    body.split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() || entry.starts_with("...") {
                return None;
            }
            let has_default = entry.contains('=');
            let name = entry
                .split([':', '='])
                .next()
                .unwrap_or("")
                .trim()
                .to_string();
            if name.is_empty() {
                None
            } else {
                Some((name, has_default))
            }
        })
        .collect()
}
