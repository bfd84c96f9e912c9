use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::super::args::SyncCommand;
use super::{
    helper::finish,
    {CommandResult, CommandSummary, SyncSummary, TemplateSync},
};

use crate::core::{
    CheckContext, ConfigOverrides, ScopeKind,
    collect::template::{documented_names, sync_template},
    rel_display,
};

/// Bring every env-file scope's template in line with the variables its
/// source files actually use. Scopes without a template get `.env.example`.
/// When no flat declaration file exists anywhere, a single root template is
/// synchronized from the whole tree's usage.
pub fn sync(cmd: SyncCommand) -> Result<CommandResult> {
    let args = &cmd.args;
    let root = &args.common.path;
    let ctx = CheckContext::new(root, ConfigOverrides::default(), args.common.verbose)?;

    let mut templates = Vec::new();

    let env_scopes: Vec<_> = ctx
        .scopes
        .iter()
        .filter(|s| s.kind == ScopeKind::EnvFile)
        .collect();

    if env_scopes.is_empty() {
        let path = root.join(".env.example");
        let used: BTreeSet<String> = ctx.all_usage().into_keys().collect();
        templates.push(sync_one(root, &path, &used, args.apply)?);
    } else {
        for scope in env_scopes {
            let path = scope
                .template_path
                .clone()
                .unwrap_or_else(|| scope_dir(root, &scope.directory).join(".env.example"));
            let used: BTreeSet<String> = scope.usage_records.keys().cloned().collect();
            templates.push(sync_one(root, &path, &used, args.apply)?);
        }
    }

    Ok(finish(
        CommandSummary::Sync(SyncSummary {
            templates,
            is_apply: args.apply,
        }),
        Vec::new(),
        ctx.source_files_checked,
        ctx.declaration_files_checked,
        false,
    ))
}

fn sync_one(root: &Path, path: &Path, used: &BTreeSet<String>, apply: bool) -> Result<TemplateSync> {
    let exists = path.exists();
    let existing = if exists {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read template {}", path.display()))?
    } else {
        String::new()
    };

    let before = documented_names(&existing);
    let output = sync_template(&existing, used);
    let after = documented_names(&output);

    let added: Vec<String> = after.difference(&before).cloned().collect();
    let removed: Vec<String> = before.difference(&after).cloned().collect();
    let changed = output != existing;

    if apply && changed {
        fs::write(path, &output)
            .with_context(|| format!("Failed to write template {}", path.display()))?;
    }

    Ok(TemplateSync {
        template: rel_display(root, path),
        created: !exists && changed,
        added,
        removed,
        changed,
    })
}

/// Inverse of `rel_display` for scope directories.
fn scope_dir(root: &Path, directory: &str) -> PathBuf {
    let rel = directory.trim_start_matches("./");
    if rel.is_empty() {
        root.to_path_buf()
    } else {
        root.join(rel)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::cli::args::{CommonArgs, SyncArgs};

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn command(root: &Path, apply: bool) -> SyncCommand {
        SyncCommand {
            args: SyncArgs {
                common: CommonArgs {
                    path: root.to_path_buf(),
                    verbose: false,
                },
                apply,
            },
        }
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = tempdir().unwrap();
        write(dir.path(), ".env", "FOO=1\n");
        write(dir.path(), "src/app.js", "process.env.FOO; process.env.NEW_VAR;");

        let result = sync(command(dir.path(), false)).unwrap();

        let CommandSummary::Sync(summary) = &result.summary else {
            panic!("expected sync summary");
        };
        assert!(!summary.is_apply);
        assert_eq!(summary.templates.len(), 1);
        assert!(summary.templates[0].changed);
        assert!(summary.templates[0].created);
        assert!(!dir.path().join(".env.example").exists());
    }

    #[test]
    fn test_apply_creates_template() {
        let dir = tempdir().unwrap();
        write(dir.path(), ".env", "FOO=1\n");
        write(dir.path(), "src/app.js", "process.env.FOO; process.env.BAR;");

        sync(command(dir.path(), true)).unwrap();

        let content = fs::read_to_string(dir.path().join(".env.example")).unwrap();
        assert_eq!(content, "BAR=\nFOO=\n");
    }

    #[test]
    fn test_apply_merges_existing_template() {
        let dir = tempdir().unwrap();
        write(dir.path(), ".env", "FOO=1\n");
        write(
            dir.path(),
            ".env.example",
            "# app config\nFOO=example-value\nSTALE=\n",
        );
        write(dir.path(), "src/app.js", "process.env.FOO; process.env.NEW_VAR;");

        let result = sync(command(dir.path(), true)).unwrap();

        let content = fs::read_to_string(dir.path().join(".env.example")).unwrap();
        assert_eq!(content, "# app config\nFOO=example-value\nNEW_VAR=\n");

        let CommandSummary::Sync(summary) = &result.summary else {
            panic!("expected sync summary");
        };
        assert_eq!(summary.templates[0].added, vec!["NEW_VAR".to_string()]);
        assert_eq!(summary.templates[0].removed, vec!["STALE".to_string()]);
        assert!(!summary.templates[0].created);
    }

    #[test]
    fn test_already_synced_template_unchanged() {
        let dir = tempdir().unwrap();
        write(dir.path(), ".env", "FOO=1\n");
        write(dir.path(), ".env.example", "FOO=\n");
        write(dir.path(), "src/app.js", "process.env.FOO;");

        let result = sync(command(dir.path(), true)).unwrap();

        let CommandSummary::Sync(summary) = &result.summary else {
            panic!("expected sync summary");
        };
        assert!(!summary.templates[0].changed);
        assert!(summary.templates[0].added.is_empty());
        assert!(summary.templates[0].removed.is_empty());
    }

    #[test]
    fn test_root_fallback_without_flat_files() {
        let dir = tempdir().unwrap();
        write(dir.path(), "src/app.js", "process.env.ONLY_USED;");

        sync(command(dir.path(), true)).unwrap();

        let content = fs::read_to_string(dir.path().join(".env.example")).unwrap();
        assert_eq!(content, "ONLY_USED=\n");
    }

    #[test]
    fn test_nested_scope_gets_its_own_template() {
        let dir = tempdir().unwrap();
        write(dir.path(), ".env", "ROOT_VAR=1\n");
        write(dir.path(), "src/app.js", "process.env.ROOT_VAR;");
        write(dir.path(), "services/worker/.env", "WORKER_VAR=1\n");
        write(
            dir.path(),
            "services/worker/handler.js",
            "process.env.WORKER_VAR;",
        );

        sync(command(dir.path(), true)).unwrap();

        let worker = fs::read_to_string(dir.path().join("services/worker/.env.example")).unwrap();
        assert_eq!(worker, "WORKER_VAR=\n");
        // The root scope sees the whole subtree, so its template documents
        // the worker's variable too.
        let root = fs::read_to_string(dir.path().join(".env.example")).unwrap();
        assert_eq!(root, "ROOT_VAR=\nWORKER_VAR=\n");
    }
}
