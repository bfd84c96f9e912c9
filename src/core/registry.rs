//! Known-variable registry.
//!
//! A static classification table mapping well-known platform, runtime, and CI
//! variable names to a category label. In non-strict mode these names are not
//! reported as missing; they are surfaced in an informational "skipped" list
//! grouped by category instead.

/// Category labels, in the order they appear in reports.
pub const CATEGORY_NODE: &str = "Node.js";
pub const CATEGORY_AWS_LAMBDA: &str = "AWS Lambda";
pub const CATEGORY_SERVERLESS_OFFLINE: &str = "Serverless Offline";
pub const CATEGORY_CI: &str = "CI";
pub const CATEGORY_TEST: &str = "Test Frameworks";
pub const CATEGORY_SYSTEM: &str = "System";

const KNOWN_VARIABLES: &[(&str, &str)] = &[
    // Node.js runtime
    ("NODE_ENV", CATEGORY_NODE),
    ("NODE_OPTIONS", CATEGORY_NODE),
    ("NODE_PATH", CATEGORY_NODE),
    ("NODE_EXTRA_CA_CERTS", CATEGORY_NODE),
    ("NODE_DEBUG", CATEGORY_NODE),
    ("NODE_TLS_REJECT_UNAUTHORIZED", CATEGORY_NODE),
    // AWS Lambda runtime
    ("AWS_REGION", CATEGORY_AWS_LAMBDA),
    ("AWS_DEFAULT_REGION", CATEGORY_AWS_LAMBDA),
    ("AWS_ACCESS_KEY_ID", CATEGORY_AWS_LAMBDA),
    ("AWS_SECRET_ACCESS_KEY", CATEGORY_AWS_LAMBDA),
    ("AWS_SESSION_TOKEN", CATEGORY_AWS_LAMBDA),
    ("AWS_EXECUTION_ENV", CATEGORY_AWS_LAMBDA),
    ("AWS_LAMBDA_FUNCTION_NAME", CATEGORY_AWS_LAMBDA),
    ("AWS_LAMBDA_FUNCTION_VERSION", CATEGORY_AWS_LAMBDA),
    ("AWS_LAMBDA_FUNCTION_MEMORY_SIZE", CATEGORY_AWS_LAMBDA),
    ("AWS_LAMBDA_LOG_GROUP_NAME", CATEGORY_AWS_LAMBDA),
    ("AWS_LAMBDA_LOG_STREAM_NAME", CATEGORY_AWS_LAMBDA),
    ("AWS_LAMBDA_RUNTIME_API", CATEGORY_AWS_LAMBDA),
    ("AWS_XRAY_CONTEXT_MISSING", CATEGORY_AWS_LAMBDA),
    ("AWS_XRAY_DAEMON_ADDRESS", CATEGORY_AWS_LAMBDA),
    ("LAMBDA_TASK_ROOT", CATEGORY_AWS_LAMBDA),
    ("LAMBDA_RUNTIME_DIR", CATEGORY_AWS_LAMBDA),
    ("_HANDLER", CATEGORY_AWS_LAMBDA),
    ("_X_AMZN_TRACE_ID", CATEGORY_AWS_LAMBDA),
    // Serverless offline / local emulation
    ("IS_OFFLINE", CATEGORY_SERVERLESS_OFFLINE),
    ("IS_LOCAL", CATEGORY_SERVERLESS_OFFLINE),
    // CI providers
    ("CI", CATEGORY_CI),
    ("GITHUB_ACTIONS", CATEGORY_CI),
    ("GITHUB_REF", CATEGORY_CI),
    ("GITHUB_SHA", CATEGORY_CI),
    ("GITHUB_WORKSPACE", CATEGORY_CI),
    ("GITLAB_CI", CATEGORY_CI),
    ("CIRCLECI", CATEGORY_CI),
    ("TRAVIS", CATEGORY_CI),
    ("BUILDKITE", CATEGORY_CI),
    ("JENKINS_URL", CATEGORY_CI),
    // Test frameworks
    ("JEST_WORKER_ID", CATEGORY_TEST),
    ("VITEST", CATEGORY_TEST),
    ("VITEST_POOL_ID", CATEGORY_TEST),
    // Operating system
    ("HOME", CATEGORY_SYSTEM),
    ("PATH", CATEGORY_SYSTEM),
    ("PWD", CATEGORY_SYSTEM),
    ("USER", CATEGORY_SYSTEM),
    ("SHELL", CATEGORY_SYSTEM),
    ("TMPDIR", CATEGORY_SYSTEM),
    ("LANG", CATEGORY_SYSTEM),
    ("TZ", CATEGORY_SYSTEM),
];

/// Look up the category of a well-known variable name.
///
/// Returns `None` for project-specific names.
pub fn known_category(name: &str) -> Option<&'static str> {
    KNOWN_VARIABLES
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, category)| *category)
}
