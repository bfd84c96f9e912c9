//! Core analysis context orchestrating the three-stage pipeline.
//!
//! `CheckContext::new` loads configuration, resolves scopes, extracts
//! references from every source file, and collects declarations. Everything
//! is recomputed from scratch on each run; nothing is persisted.
//!
//! File reads run in parallel, but results are merged over a pre-sorted file
//! list so first-wins de-duplication and location ordering are reproducible
//! regardless of read completion order.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Result, bail};
use rayon::prelude::*;

use crate::{
    config::{Config, load_config},
    core::{
        collect::{
            DeclarationSource, DeclaredVariables, dotenv::parse_dotenv, manifest::parse_manifest,
            merge_declarations, template::documented_names,
        },
        extract::extract_references,
        scope::{ExclusionMatcher, ScopeKind, discover, rel_display, resolve_scopes},
        usage::{FileUsage, UsageRecord, merge_file_usage},
    },
};

/// A recoverable problem encountered during the run: an unreadable file or
/// an unparseable declaration source. Never fatal; the file simply
/// contributes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditWarning {
    pub path: String,
    pub message: String,
}

/// The set of names documented in a human-facing template file.
///
/// `found` distinguishes "template exists but documents nothing" from "no
/// template at all": a missing template is tolerated and no documentation
/// contract is enforced against it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleSet {
    pub names: BTreeSet<String>,
    pub found: bool,
}

/// One independent unit of analysis: a directory subtree reconciled against
/// one declaration mechanism.
#[derive(Debug)]
pub struct Scope {
    /// Relative display path of the scope directory.
    pub directory: String,
    pub kind: ScopeKind,
    /// Used variables aggregated over the scope's source files.
    pub usage_records: BTreeMap<String, UsageRecord>,
    /// Declared variables, first declaration wins.
    pub declared: DeclaredVariables,
    pub example: ExampleSet,
    /// Absolute path of the scope's template file, when one exists.
    pub template_path: Option<PathBuf>,
}

/// CLI flag overrides applied on top of the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigOverrides {
    pub strict: bool,
    pub no_fallbacks: bool,
}

/// Everything a command needs to reconcile a project tree.
pub struct CheckContext {
    pub config: Config,
    pub root_dir: PathBuf,
    pub verbose: bool,
    pub scopes: Vec<Scope>,
    pub warnings: Vec<AuditWarning>,
    /// Per-file extraction results keyed by relative path, for callers that
    /// need usage outside scope boundaries (template sync).
    pub file_usage: BTreeMap<String, FileUsage>,
    pub source_files_checked: usize,
    pub declaration_files_checked: usize,
}

impl CheckContext {
    /// Build the context for one run.
    ///
    /// # Errors
    ///
    /// Only a wholly inaccessible project root is fatal; unreadable or
    /// malformed files inside the tree become warnings.
    pub fn new(root: &Path, overrides: ConfigOverrides, verbose: bool) -> Result<Self> {
        if !root.is_dir() {
            bail!("project root is not accessible: {}", root.display());
        }

        let mut warnings = Vec::new();

        let load_result = load_config(root);
        let had_config_warning = load_result.warning.is_some();
        if let Some(message) = load_result.warning {
            warnings.push(AuditWarning {
                path: rel_display(root, root),
                message: format!("{} (using default configuration)", message),
            });
        }
        if verbose && !load_result.from_file && !had_config_warning {
            eprintln!(
                "Note: no {} found, using default configuration",
                crate::config::CONFIG_FILE_NAME
            );
        }

        let mut config = load_result.config;
        if overrides.strict {
            config.strict_mode = true;
        }
        if overrides.no_fallbacks {
            config.detect_fallbacks = false;
        }

        let matcher = ExclusionMatcher::new(&config.exclude_globs);
        let discovered = discover(root, &matcher, &config.source_extensions);
        for error in &discovered.walk_errors {
            warnings.push(AuditWarning {
                path: rel_display(root, root),
                message: error.clone(),
            });
        }

        // Reads are parallel; the input list is pre-sorted, and collecting
        // into a Vec preserves that order for the sequential merge below.
        let extraction: Vec<(String, std::result::Result<FileUsage, String>)> = discovered
            .source_files
            .par_iter()
            .map(|path| {
                let rel = rel_display(root, path);
                match fs::read_to_string(path) {
                    Ok(text) => (rel, Ok(extract_references(&text))),
                    Err(err) => (rel, Err(err.to_string())),
                }
            })
            .collect();

        let mut file_usage: BTreeMap<String, FileUsage> = BTreeMap::new();
        for (rel, result) in extraction {
            match result {
                Ok(usage) => {
                    file_usage.insert(rel, usage);
                }
                Err(message) => warnings.push(AuditWarning {
                    path: rel,
                    message: format!("could not read file: {}", message),
                }),
            }
        }

        let plans = resolve_scopes(&discovered);
        let mut scopes = Vec::with_capacity(plans.len());
        for plan in plans {
            let mut usage_records: BTreeMap<String, UsageRecord> = BTreeMap::new();
            for file in &plan.source_files {
                let rel = rel_display(root, file);
                if let Some(usage) = file_usage.get(&rel) {
                    merge_file_usage(&mut usage_records, &rel, usage);
                }
            }

            let mut declared = DeclaredVariables::new();
            for source in &plan.declaration_sources {
                let rel = rel_display(root, source.path());
                match collect_declarations(source, &rel) {
                    Ok(vars) => merge_declarations(&mut declared, vars),
                    Err(message) => warnings.push(AuditWarning { path: rel, message }),
                }
            }

            let mut example = ExampleSet::default();
            if let Some(template) = &plan.template {
                let rel = rel_display(root, template);
                match fs::read_to_string(template) {
                    Ok(content) => {
                        example.names = documented_names(&content);
                        example.found = true;
                    }
                    Err(err) => warnings.push(AuditWarning {
                        path: rel,
                        message: format!("could not read template: {}", err),
                    }),
                }
            }

            scopes.push(Scope {
                directory: rel_display(root, &plan.directory),
                kind: plan.kind,
                usage_records,
                declared,
                example,
                template_path: plan.template.clone(),
            });
        }

        Ok(Self {
            config,
            root_dir: root.to_path_buf(),
            verbose,
            scopes,
            warnings,
            source_files_checked: discovered.source_files.len(),
            declaration_files_checked: discovered.flat_files.len() + discovered.manifests.len(),
            file_usage,
        })
    }

    /// Every variable name referenced anywhere in the tree, with the OR of
    /// all guardedness. Used by template sync when no scope covers a file.
    pub fn all_usage(&self) -> BTreeMap<String, UsageRecord> {
        let mut records = BTreeMap::new();
        for (rel, usage) in &self.file_usage {
            merge_file_usage(&mut records, rel, usage);
        }
        records
    }
}

/// Parse one declaration source into its variable map. An unparseable or
/// unreadable source is an `Err(message)`: the caller records a warning and
/// the source contributes no declarations.
fn collect_declarations(
    source: &DeclarationSource,
    rel: &str,
) -> std::result::Result<DeclaredVariables, String> {
    match source {
        DeclarationSource::Flat(path) => {
            let content =
                fs::read_to_string(path).map_err(|err| format!("could not read file: {}", err))?;
            Ok(parse_dotenv(&content, rel))
        }
        DeclarationSource::Manifest(path) => {
            let content =
                fs::read_to_string(path).map_err(|err| format!("could not read file: {}", err))?;
            parse_manifest(&content, rel).map_err(|err| format!("{:#}", err))
        }
        DeclarationSource::Template(path) => {
            // Templates never contribute runtime declarations.
            let _ = path;
            Ok(DeclaredVariables::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use crate::core::context::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_context_builds_env_scope() {
        let dir = tempdir().unwrap();
        write(dir.path(), ".env", "DATABASE_URL=postgres://localhost\n");
        write(dir.path(), "src/db.js", "const url = process.env.DATABASE_URL;");

        let ctx = CheckContext::new(dir.path(), ConfigOverrides::default(), false).unwrap();

        assert_eq!(ctx.scopes.len(), 1);
        let scope = &ctx.scopes[0];
        assert_eq!(scope.kind, ScopeKind::EnvFile);
        assert!(scope.declared.contains_key("DATABASE_URL"));
        assert!(scope.usage_records.contains_key("DATABASE_URL"));
        assert_eq!(
            scope.usage_records["DATABASE_URL"].locations,
            vec!["./src/db.js"]
        );
        assert_eq!(ctx.source_files_checked, 1);
        assert!(ctx.warnings.is_empty());
    }

    #[test]
    fn test_inaccessible_root_is_fatal() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert!(CheckContext::new(&missing, ConfigOverrides::default(), false).is_err());
    }

    #[test]
    fn test_unparseable_manifest_contributes_nothing() {
        let dir = tempdir().unwrap();
        write(dir.path(), "serverless.yml", "provider:\n  environment:\n - [broken");
        write(dir.path(), "src/app.js", "process.env.FOO;");

        let ctx = CheckContext::new(dir.path(), ConfigOverrides::default(), false).unwrap();

        assert_eq!(ctx.scopes.len(), 1);
        assert!(ctx.scopes[0].declared.is_empty());
        assert_eq!(ctx.warnings.len(), 1);
        assert_eq!(ctx.warnings[0].path, "./serverless.yml");
    }

    #[test]
    fn test_first_wins_across_flat_files() {
        let dir = tempdir().unwrap();
        write(dir.path(), ".env", "SHARED=from-env\n");
        write(dir.path(), ".env.local", "SHARED=from-local\nONLY_LOCAL=1\n");

        let ctx = CheckContext::new(dir.path(), ConfigOverrides::default(), false).unwrap();

        let scope = &ctx.scopes[0];
        // `.env` sorts before `.env.local`, so its declaration wins.
        assert_eq!(scope.declared["SHARED"].raw_value, "from-env");
        assert_eq!(scope.declared["SHARED"].source, "./.env");
        assert!(scope.declared.contains_key("ONLY_LOCAL"));
    }

    #[test]
    fn test_template_names_attached_to_scope() {
        let dir = tempdir().unwrap();
        write(dir.path(), ".env", "FOO=1\n");
        write(dir.path(), ".env.example", "FOO=\nBAR=\n");

        let ctx = CheckContext::new(dir.path(), ConfigOverrides::default(), false).unwrap();

        let example = &ctx.scopes[0].example;
        assert!(example.found);
        assert_eq!(example.names.len(), 2);
        assert!(example.names.contains("BAR"));
    }

    #[test]
    fn test_missing_template_is_not_found() {
        let dir = tempdir().unwrap();
        write(dir.path(), ".env", "FOO=1\n");

        let ctx = CheckContext::new(dir.path(), ConfigOverrides::default(), false).unwrap();

        assert!(!ctx.scopes[0].example.found);
        assert!(ctx.scopes[0].example.names.is_empty());
    }

    #[test]
    fn test_overrides_apply() {
        let dir = tempdir().unwrap();
        write(dir.path(), ".env", "FOO=1\n");

        let overrides = ConfigOverrides {
            strict: true,
            no_fallbacks: true,
        };
        let ctx = CheckContext::new(dir.path(), overrides, false).unwrap();

        assert!(ctx.config.strict_mode);
        assert!(!ctx.config.detect_fallbacks);
    }

    #[test]
    fn test_all_usage_aggregates_every_file() {
        let dir = tempdir().unwrap();
        write(dir.path(), "src/a.js", "process.env.FOO || 'x';");
        write(dir.path(), "lib/b.js", "process.env.BAR;");

        let ctx = CheckContext::new(dir.path(), ConfigOverrides::default(), false).unwrap();
        let usage = ctx.all_usage();

        assert!(usage["FOO"].has_fallback);
        assert!(!usage["BAR"].has_fallback);
    }

    #[test]
    fn test_malformed_config_warns_and_defaults() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        write(dir.path(), ".envauditrc.json", "{ broken");
        write(dir.path(), ".env", "FOO=1\n");

        let ctx = CheckContext::new(dir.path(), ConfigOverrides::default(), false).unwrap();

        assert!(!ctx.config.strict_mode);
        assert!(ctx.warnings.iter().any(|w| w.message.contains("default configuration")));
    }
}
