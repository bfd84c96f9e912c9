//! Issue types for environment variable reconciliation results.
//!
//! Each issue is self-contained with all information needed by the reporter
//! (CLI output) and by callers consuming the programmatic result object.

use enum_dispatch::enum_dispatch;

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    MissingVar,
    UnusedVar,
    UndocumentedVar,
    ParseError,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::MissingVar => write!(f, "missing-var"),
            Rule::UnusedVar => write!(f, "unused-var"),
            Rule::UndocumentedVar => write!(f, "undocumented-var"),
            Rule::ParseError => write!(f, "parse-error"),
        }
    }
}

// ============================================================
// Issue Types
// ============================================================

/// Variable read in code but declared nowhere in the scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingVarIssue {
    pub name: String,
    /// `Error` for bare usage (or when fallback detection is off),
    /// `Warning` when every usage site tolerates absence.
    pub severity: Severity,
    /// True when at least one usage site has a safe fallback.
    pub has_fallback: bool,
    /// Files referencing the variable, in first-seen order.
    pub locations: Vec<String>,
}

impl MissingVarIssue {
    pub fn rule() -> Rule {
        Rule::MissingVar
    }
}

/// Variable declared but never referenced anywhere in the scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedVarIssue {
    pub name: String,
    /// The declaring file.
    pub source: String,
    /// 1-based line for flat files; absent for manifest entries.
    pub line_number: Option<usize>,
    /// True when the declared value defers to an external system; such
    /// entries often exist for tooling other than the scanned code.
    pub is_external_reference: bool,
}

impl UnusedVarIssue {
    pub fn severity() -> Severity {
        Severity::Info
    }

    pub fn rule() -> Rule {
        Rule::UnusedVar
    }
}

/// Variable used and declared, but absent from the example template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndocumentedVarIssue {
    pub name: String,
    /// `Info` for guarded usage when fallback detection is on, otherwise
    /// `Warning`.
    pub severity: Severity,
    pub locations: Vec<String>,
}

impl UndocumentedVarIssue {
    pub fn rule() -> Rule {
        Rule::UndocumentedVar
    }
}

/// File could not be read or parsed; it contributed nothing to the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl ParseErrorIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::ParseError
    }
}

// ============================================================
// Issue Enum
// ============================================================

/// A reconciliation issue found during analysis.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    MissingVar(MissingVarIssue),
    UnusedVar(UnusedVarIssue),
    UndocumentedVar(UndocumentedVarIssue),
    ParseError(ParseErrorIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        self.report_severity()
    }

    pub fn rule(&self) -> Rule {
        self.report_rule()
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Trait implemented by all issue types to provide a consistent interface
/// for the reporter. Uses `enum_dispatch` for zero-cost dispatch on the
/// `Issue` enum.
#[enum_dispatch]
pub trait Report {
    /// Primary message to display.
    fn message(&self) -> String;

    /// Severity level.
    fn report_severity(&self) -> Severity;

    /// Rule identifier.
    fn report_rule(&self) -> Rule;

    /// File paths to list under the message.
    fn paths(&self) -> Vec<String>;

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

impl Report for MissingVarIssue {
    fn message(&self) -> String {
        format!("{} is used but never declared", self.name)
    }

    fn report_severity(&self) -> Severity {
        self.severity
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn paths(&self) -> Vec<String> {
        self.locations.clone()
    }

    fn details(&self) -> Option<String> {
        self.has_fallback
            .then(|| "a fallback exists at the usage site".to_string())
    }
}

impl Report for UnusedVarIssue {
    fn message(&self) -> String {
        format!("{} is declared but never used", self.name)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn paths(&self) -> Vec<String> {
        match self.line_number {
            Some(line) => vec![format!("{}:{}", self.source, line)],
            None => vec![self.source.clone()],
        }
    }

    fn details(&self) -> Option<String> {
        self.is_external_reference
            .then(|| "value is resolved by an external system".to_string())
    }
}

impl Report for UndocumentedVarIssue {
    fn message(&self) -> String {
        format!("{} is not documented in the example file", self.name)
    }

    fn report_severity(&self) -> Severity {
        self.severity
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn paths(&self) -> Vec<String> {
        self.locations.clone()
    }
}

impl Report for ParseErrorIssue {
    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn paths(&self) -> Vec<String> {
        vec![self.file_path.clone()]
    }
}

// ============================================================
// Ordering for Issue (for sorting in reports)
// ============================================================

impl Issue {
    fn sort_path(&self) -> String {
        self.paths().first().cloned().unwrap_or_default()
    }

    fn sort_name(&self) -> &str {
        match self {
            Issue::MissingVar(issue) => &issue.name,
            Issue::UnusedVar(issue) => &issue.name,
            Issue::UndocumentedVar(issue) => &issue.name,
            Issue::ParseError(issue) => &issue.file_path,
        }
    }
}

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: severity, rule, first path, variable name.
        self.severity()
            .cmp(&other.severity())
            .then_with(|| self.rule().cmp(&other.rule()))
            .then_with(|| self.sort_path().cmp(&other.sort_path()))
            .then_with(|| self.sort_name().cmp(other.sort_name()))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================
// Tests
// ============================================================
