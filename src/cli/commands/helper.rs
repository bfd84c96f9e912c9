use super::{CommandResult, CommandSummary};
use crate::issues::{Issue, Severity};

pub fn finish(
    summary: CommandSummary,
    mut issues: Vec<Issue>,
    source_files_checked: usize,
    declaration_files_checked: usize,
    fail_on_any_issue: bool,
) -> CommandResult {
    issues.sort();

    let error_count = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();

    CommandResult {
        summary,
        issues,
        error_count,
        fail_on_any_issue,
        source_files_checked,
        declaration_files_checked,
    }
}
