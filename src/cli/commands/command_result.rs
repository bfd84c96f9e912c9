use std::collections::BTreeMap;

use crate::issues::Issue;

#[derive(Debug)]
pub enum CommandSummary {
    Check(CheckSummary),
    Sync(SyncSummary),
    Init(InitSummary),
}

#[derive(Debug, Default)]
pub struct CheckSummary {
    /// Allowlisted used-but-undeclared names grouped by registry category
    /// (or the config-ignore label). Empty in strict mode.
    pub skipped: BTreeMap<String, Vec<String>>,
}

/// Outcome of synchronizing one template file.
#[derive(Debug)]
pub struct TemplateSync {
    /// Relative display path of the template.
    pub template: String,
    /// The template did not exist before this run.
    pub created: bool,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    /// False when the template was already in sync.
    pub changed: bool,
}

#[derive(Debug)]
pub struct SyncSummary {
    pub templates: Vec<TemplateSync>,
    pub is_apply: bool,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running an envaudit command.
pub struct CommandResult {
    pub summary: CommandSummary,
    /// All issues found, sorted. Empty for non-check commands.
    pub issues: Vec<Issue>,
    /// Number of error-severity issues.
    pub error_count: usize,
    /// If true, any issue fails the run, not only errors (--ci).
    pub fail_on_any_issue: bool,
    pub source_files_checked: usize,
    pub declaration_files_checked: usize,
}
