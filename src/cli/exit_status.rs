use std::process::ExitCode;

use crate::cli::commands::CommandResult;

/// Exit status for CLI commands, following common conventions for linter tools.
///
/// - `Success` (0): Command completed, no reportable issues
/// - `Failure` (1): Command completed but the issue threshold was crossed
/// - `Error` (2): Command failed due to internal error (inaccessible root, etc.)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}

/// Error-severity issues always fail the run; with `--ci` any issue does.
pub fn from_result(result: &CommandResult) -> ExitStatus {
    if result.error_count > 0 || (result.fail_on_any_issue && !result.issues.is_empty()) {
        ExitStatus::Failure
    } else {
        ExitStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::{CommandSummary, InitSummary};
    use crate::issues::{Issue, UnusedVarIssue};

    fn result_with(issues: Vec<Issue>, error_count: usize, ci: bool) -> CommandResult {
        CommandResult {
            summary: CommandSummary::Init(InitSummary { created: false }),
            issues,
            error_count,
            fail_on_any_issue: ci,
            source_files_checked: 0,
            declaration_files_checked: 0,
        }
    }

    fn info_issue() -> Issue {
        Issue::UnusedVar(UnusedVarIssue {
            name: "X".to_string(),
            source: "./.env".to_string(),
            line_number: Some(1),
            is_external_reference: false,
        })
    }

    #[test]
    fn exit_code_values() {
        assert_eq!(ExitCode::from(ExitStatus::Success), ExitCode::from(0));
        assert_eq!(ExitCode::from(ExitStatus::Failure), ExitCode::from(1));
        assert_eq!(ExitCode::from(ExitStatus::Error), ExitCode::from(2));
    }

    #[test]
    fn test_no_issues_is_success() {
        assert_eq!(from_result(&result_with(Vec::new(), 0, false)), ExitStatus::Success);
    }

    #[test]
    fn test_errors_fail_without_ci() {
        assert_eq!(from_result(&result_with(vec![info_issue()], 1, false)), ExitStatus::Failure);
    }

    #[test]
    fn test_non_errors_pass_without_ci() {
        assert_eq!(from_result(&result_with(vec![info_issue()], 0, false)), ExitStatus::Success);
    }

    #[test]
    fn test_ci_fails_on_any_issue() {
        assert_eq!(from_result(&result_with(vec![info_issue()], 0, true)), ExitStatus::Failure);
    }
}
