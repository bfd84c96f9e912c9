//! Deployment manifest collector (`serverless.yml`).
//!
//! Collection order is the provider-level environment block first, then each
//! function-level block in document order; a name collected at the provider
//! level is never overwritten by a function-level entry. Structured values
//! (cloud-intrinsic tags, nested mappings) are stringified to their literal
//! textual form rather than dropped.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde_yaml::Value;

use crate::core::collect::{DeclaredVariable, DeclaredVariables};
use crate::utils::is_valid_manifest_key;

/// Deferred-resolution value syntaxes: parameter store (`${ssm:...}`),
/// secrets store, external file inclusion (`${file(...)}`), custom variables
/// (`${self:...}`), CLI options (`${opt:...}`), environment passthrough
/// (`${env:...}`), and cross-stack outputs (`${cf:...}`, `Fn::ImportValue`).
static EXTERNAL_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\$\{\s*(?:ssm[:(]|secrets\w*:|file\(|self:|opt:|env:|cf[.:(]|param:)|Fn::(?:ImportValue|GetAtt)|!(?:ImportValue|GetAtt)\b",
    )
    .expect("valid regex")
});

/// Parse a manifest document and collect its declared variables.
///
/// Returns an error for unparseable YAML; the caller treats that as "no
/// declarations found" plus a warning, never as an abort.
pub fn parse_manifest(content: &str, source: &str) -> Result<DeclaredVariables> {
    let doc: Value =
        serde_yaml::from_str(content).with_context(|| format!("invalid manifest: {}", source))?;

    let mut declared = DeclaredVariables::new();

    // Provider-level block first.
    if let Some(environment) = doc.get("provider").and_then(|p| p.get("environment")) {
        collect_block(environment, source, &mut declared);
    }

    // Then each function-level override block, in document order.
    if let Some(Value::Mapping(functions)) = doc.get("functions") {
        for function in functions.values() {
            if let Some(environment) = function.get("environment") {
                collect_block(environment, source, &mut declared);
            }
        }
    }

    Ok(declared)
}

/// Collect one `environment:` mapping, first-wins against what is already
/// present in `declared`.
fn collect_block(environment: &Value, source: &str, declared: &mut DeclaredVariables) {
    let Value::Mapping(entries) = environment else {
        return;
    };

    for (key, value) in entries {
        let Value::String(name) = key else {
            continue;
        };
        if !is_valid_manifest_key(name) {
            continue;
        }

        let raw_value = stringify_value(value);
        declared
            .entry(name.clone())
            .or_insert_with(|| DeclaredVariable {
                name: name.clone(),
                is_external_reference: is_external_reference(&raw_value),
                raw_value,
                line_number: None,
                source: source.to_string(),
            });
    }
}

/// Render a YAML value to a single-line literal form. Cloud-intrinsic tagged
/// values keep their tag (`!Ref MyTable`), mappings and sequences are
/// flattened to flow style.
fn stringify_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(seq) => {
            let items: Vec<String> = seq.iter().map(stringify_value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Mapping(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", stringify_value(k), stringify_value(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        Value::Tagged(tagged) => {
            let inner = stringify_value(&tagged.value);
            if inner.is_empty() {
                tagged.tag.to_string()
            } else {
                format!("{} {}", tagged.tag, inner)
            }
        }
    }
}

/// True when a stringified value matches one of the deferred-resolution
/// syntaxes.
pub fn is_external_reference(raw_value: &str) -> bool {
    EXTERNAL_REFERENCE.is_match(raw_value)
}
