//! Report formatting and printing utilities.
//!
//! This module provides functions to display issues in cargo-style format.
//! Separate from core logic to allow envaudit to be used as a library.

use std::collections::BTreeMap;
use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{CommandResult, CommandSummary, InitSummary, SyncSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::issues::{Issue, Report, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Maximum number of file locations to display per issue.
const MAX_LOCATIONS_DISPLAY: usize = 3;

pub fn print(result: &CommandResult, verbose: bool) {
    match &result.summary {
        CommandSummary::Check(summary) => {
            report(&result.issues);
            print_skipped(&summary.skipped);
            if result.issues.is_empty() {
                print_success(result.source_files_checked, result.declaration_files_checked);
            } else if verbose {
                println!(
                    "{}",
                    format!(
                        "checked {} source file(s), {} declaration file(s)",
                        result.source_files_checked, result.declaration_files_checked
                    )
                    .dimmed()
                );
            }
        }
        CommandSummary::Sync(summary) => print_sync(summary),
        CommandSummary::Init(summary) => print_init(summary),
    }
}

/// Print issues in cargo-style format to stdout.
pub fn report(issues: &[Issue]) {
    report_to(issues, &mut io::stdout().lock());
}

/// Print issues to a custom writer.
///
/// Useful for testing or redirecting output.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort();

    for issue in &sorted {
        print_issue(issue, writer);
    }

    print_summary(&sorted, writer);
}

/// Print a success message when no issues are found.
pub fn print_success(source_files: usize, declaration_files: usize) {
    print_success_to(source_files, declaration_files, &mut io::stdout().lock());
}

/// Print a success message to a custom writer.
pub fn print_success_to<W: Write>(source_files: usize, declaration_files: usize, writer: &mut W) {
    let msg = format!(
        "Checked {} source {}, {} declaration {} - no issues found",
        source_files,
        if source_files == 1 { "file" } else { "files" },
        declaration_files,
        if declaration_files == 1 { "file" } else { "files" }
    );
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), msg.green());
}

/// Print the allowlisted names the run chose not to evaluate.
pub fn print_skipped(skipped: &BTreeMap<String, Vec<String>>) {
    print_skipped_to(skipped, &mut io::stdout().lock());
}

pub fn print_skipped_to<W: Write>(skipped: &BTreeMap<String, Vec<String>>, writer: &mut W) {
    if skipped.is_empty() {
        return;
    }

    let total: usize = skipped.values().map(Vec::len).sum();
    let _ = writeln!(
        writer,
        "{} skipped {} allowlisted {} (use {} to evaluate them):",
        "note:".bold().cyan(),
        total,
        if total == 1 { "variable" } else { "variables" },
        "--strict".cyan()
    );
    // Align the name lists across categories, using display widths.
    let label_width = skipped
        .keys()
        .map(|c| UnicodeWidthStr::width(c.as_str()))
        .max()
        .unwrap_or(0);
    for (category, names) in skipped {
        let pad = label_width - UnicodeWidthStr::width(category.as_str());
        let _ = writeln!(
            writer,
            "  - {}:{} {}",
            category,
            " ".repeat(pad),
            names.join(", ").dimmed()
        );
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W) {
    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
        Severity::Info => "info".bold().blue(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    // Clickable locations, cargo-style.
    let paths = issue.paths();
    let display_count = paths.len().min(MAX_LOCATIONS_DISPLAY);
    for (i, path) in paths.iter().take(display_count).enumerate() {
        let is_last = i == display_count - 1;
        let remaining = paths.len().saturating_sub(display_count);
        let suffix = if is_last && remaining > 0 {
            format!(" (and {} more)", remaining)
        } else {
            String::new()
        };
        let _ = writeln!(writer, "  {} {}{}", "-->".blue(), path, suffix);
    }

    if let Some(details) = issue.details() {
        let _ = writeln!(writer, "   {} {} {}", "=".blue(), "note:".bold(), details);
    }

    let _ = writeln!(writer); // Empty line between issues
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let count_of = |severity: Severity| {
        issues
            .iter()
            .filter(|i| i.report_severity() == severity)
            .count()
    };
    let total_errors = count_of(Severity::Error);
    let total_warnings = count_of(Severity::Warning);
    let total_infos = count_of(Severity::Info);
    let total_problems = total_errors + total_warnings + total_infos;

    if total_problems > 0 {
        let _ = writeln!(
            writer,
            "{} {} problems ({} {}, {} {}, {} infos)",
            FAILURE_MARK.red(),
            total_problems,
            total_errors,
            if total_errors == 1 { "error" } else { "errors" }.red(),
            total_warnings,
            if total_warnings == 1 {
                "warning"
            } else {
                "warnings"
            }
            .yellow(),
            total_infos
        );
    }
}

fn print_sync(summary: &SyncSummary) {
    let changed: Vec<_> = summary.templates.iter().filter(|t| t.changed).collect();

    if changed.is_empty() {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            "Templates already in sync".green()
        );
        return;
    }

    for outcome in &changed {
        let verb = match (summary.is_apply, outcome.created) {
            (true, true) => "Created".green().bold(),
            (true, false) => "Updated".green().bold(),
            (false, true) => "Would create".yellow().bold(),
            (false, false) => "Would update".yellow().bold(),
        };
        println!(
            "{} {} (+{} added, -{} removed)",
            verb,
            outcome.template,
            outcome.added.len(),
            outcome.removed.len()
        );
        if !outcome.added.is_empty() {
            println!("  + {}", outcome.added.join(", "));
        }
        if !outcome.removed.is_empty() {
            println!("  - {}", outcome.removed.join(", "));
        }
    }

    if !summary.is_apply {
        println!("Run with {} to write these files.", "--apply".cyan());
    }
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}

// ============================================================
// Tests
// ============================================================
