//! Template (`.env.example`) parsing and regeneration.
//!
//! The template documents which variables a project expects, independent of
//! runtime wiring. Parsing only needs the set of documented names.
//! Regeneration is a deterministic text merge: comments stay verbatim in
//! their original relative position, entries for still-used names stay as
//! written, entries for dropped names disappear, and newly discovered names
//! are appended. Re-running on already-synced content is a no-op.

use std::collections::BTreeSet;

use crate::utils::is_valid_var_name;

/// One line of a template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateLine {
    /// A documented `NAME=value` entry; `raw` is the full original line.
    Entry { name: String, raw: String },
    /// Anything else (comments, blanks, malformed lines), preserved verbatim.
    Text(String),
}

/// Parse template content into its line structure.
pub fn parse_template(content: &str) -> Vec<TemplateLine> {
    content
        .lines()
        .map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return TemplateLine::Text(line.to_string());
            }
            match trimmed.split_once('=') {
                Some((name, _)) if is_valid_var_name(name.trim()) => TemplateLine::Entry {
                    name: name.trim().to_string(),
                    raw: line.to_string(),
                },
                _ => TemplateLine::Text(line.to_string()),
            }
        })
        .collect()
}

/// Extract the set of documented names from template content.
pub fn documented_names(content: &str) -> BTreeSet<String> {
    parse_template(content)
        .into_iter()
        .filter_map(|line| match line {
            TemplateLine::Entry { name, .. } => Some(name),
            TemplateLine::Text(_) => None,
        })
        .collect()
}

/// Produce new template content synchronized with `used`.
///
/// Byte-stable: identical inputs produce identical output, and output that is
/// already in sync passes through unchanged (modulo a final trailing newline
/// on files that lacked one).
pub fn sync_template(existing: &str, used: &BTreeSet<String>) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut documented: BTreeSet<String> = BTreeSet::new();

    for line in parse_template(existing) {
        match line {
            TemplateLine::Entry { name, raw } => {
                if used.contains(&name) {
                    documented.insert(name);
                    lines.push(raw);
                }
                // Dropped: documented but no longer used anywhere in scope.
            }
            TemplateLine::Text(text) => lines.push(text),
        }
    }

    // Append newly discovered names in sorted order so a second pass over the
    // output is a no-op.
    for name in used {
        if !documented.contains(name) {
            lines.push(format!("{}=", name));
        }
    }

    let mut output = lines.join("\n");
    if !output.is_empty() {
        output.push('\n');
    }
    output
}
