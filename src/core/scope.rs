//! Scope resolver.
//!
//! Discovers declaration sources and source files under the project root and
//! groups them into scopes: one scope per directory holding flat env files,
//! one scope per deployment manifest. A directory carrying both participates
//! in two reconciliations, because the two declaration mechanisms have
//! different audiences and different "unused" semantics.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::core::collect::DeclarationSource;

/// Directory names that are never scanned, regardless of configuration.
pub const ALWAYS_EXCLUDED_DIRS: &[&str] = &[".git", "node_modules"];

/// Source file extensions scanned by default.
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs"];

/// Normalized exclusion patterns: a plain name excludes that name as a
/// directory segment anywhere in the tree; a pattern with wildcards is
/// matched verbatim against the relative path.
pub struct ExclusionMatcher {
    segment_names: Vec<String>,
    patterns: Vec<Pattern>,
}

impl ExclusionMatcher {
    pub fn new(exclude_globs: &[String]) -> Self {
        let mut segment_names: Vec<String> =
            ALWAYS_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect();
        let mut patterns = Vec::new();

        for glob in exclude_globs {
            if glob.contains('*') || glob.contains('?') {
                if let Ok(pattern) = Pattern::new(glob) {
                    patterns.push(pattern);
                }
            } else if !segment_names.iter().any(|s| s == glob) {
                segment_names.push(glob.clone());
            }
        }

        Self {
            segment_names,
            patterns,
        }
    }

    /// True if a directory with this name must be skipped wherever it occurs.
    pub fn excludes_dir(&self, name: &str) -> bool {
        self.segment_names.iter().any(|s| s == name)
    }

    /// True if a relative file path matches one of the wildcard patterns.
    pub fn excludes_path(&self, rel_path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(rel_path))
    }
}

/// Kinds of files the resolver cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Source,
    Flat,
    Manifest,
    Template,
}

fn classify(file_name: &str, extensions: &[String]) -> Option<FileKind> {
    if file_name.starts_with(".env") && file_name.ends_with(".example") {
        return Some(FileKind::Template);
    }
    if file_name == ".env" || file_name.starts_with(".env.") {
        return Some(FileKind::Flat);
    }
    if file_name == "serverless.yml" || file_name == "serverless.yaml" {
        return Some(FileKind::Manifest);
    }
    let ext = Path::new(file_name).extension()?.to_str()?;
    if extensions.iter().any(|e| e == ext) {
        return Some(FileKind::Source);
    }
    None
}

/// All relevant files discovered under the project root, each list sorted
/// lexicographically so downstream merges are deterministic.
#[derive(Debug, Default)]
pub struct DiscoveredFiles {
    pub source_files: Vec<PathBuf>,
    pub flat_files: Vec<PathBuf>,
    pub manifests: Vec<PathBuf>,
    pub templates: Vec<PathBuf>,
    /// Walk errors (unreadable directories), surfaced as warnings.
    pub walk_errors: Vec<String>,
}

/// Walk the project tree, honoring exclusions.
pub fn discover(root: &Path, matcher: &ExclusionMatcher, extensions: &[String]) -> DiscoveredFiles {
    let mut discovered = DiscoveredFiles::default();

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        if !entry.file_type().is_dir() {
            return true;
        }
        let Some(name) = entry.file_name().to_str() else {
            return false;
        };
        // Never descend into excluded directories; the root itself is always
        // entered even if its name matches.
        entry.depth() == 0 || !matcher.excludes_dir(name)
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                discovered.walk_errors.push(err.to_string());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        let rel = rel_display(root, entry.path());
        if matcher.excludes_path(rel.trim_start_matches("./")) || matcher.excludes_path(&rel) {
            continue;
        }

        match classify(file_name, extensions) {
            Some(FileKind::Source) => discovered.source_files.push(entry.into_path()),
            Some(FileKind::Flat) => discovered.flat_files.push(entry.into_path()),
            Some(FileKind::Manifest) => discovered.manifests.push(entry.into_path()),
            Some(FileKind::Template) => discovered.templates.push(entry.into_path()),
            None => {}
        }
    }

    discovered.source_files.sort();
    discovered.flat_files.sort();
    discovered.manifests.sort();
    discovered.templates.sort();
    discovered
}

/// Which declaration mechanism a scope reconciles against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScopeKind {
    EnvFile,
    Manifest,
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeKind::EnvFile => write!(f, "env file"),
            ScopeKind::Manifest => write!(f, "manifest"),
        }
    }
}

/// One planned reconciliation unit: a declaration source (or the merged flat
/// files of one directory), its template, and every source file in scope.
#[derive(Debug)]
pub struct ScopePlan {
    pub directory: PathBuf,
    pub kind: ScopeKind,
    /// Flat files of the directory in lexicographic order, or the single
    /// manifest. First declaration wins across this list.
    pub declaration_sources: Vec<DeclarationSource>,
    pub template: Option<PathBuf>,
    /// Every matching source file at or below the scope directory.
    pub source_files: Vec<PathBuf>,
}

/// Group discovered declaration sources into scopes.
pub fn resolve_scopes(discovered: &DiscoveredFiles) -> Vec<ScopePlan> {
    let mut plans = Vec::new();

    // One scope per directory holding flat files.
    let mut flat_by_dir: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    for file in &discovered.flat_files {
        if let Some(parent) = file.parent() {
            flat_by_dir
                .entry(parent.to_path_buf())
                .or_default()
                .push(file.clone());
        }
    }
    for (directory, files) in flat_by_dir {
        plans.push(ScopePlan {
            source_files: files_under(&discovered.source_files, &directory),
            template: template_for(&discovered.templates, &directory),
            declaration_sources: files.into_iter().map(DeclarationSource::Flat).collect(),
            kind: ScopeKind::EnvFile,
            directory,
        });
    }

    // One scope per manifest, computed independently of any flat files in
    // the same directory.
    for manifest in &discovered.manifests {
        let directory = manifest
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        plans.push(ScopePlan {
            source_files: files_under(&discovered.source_files, &directory),
            template: template_for(&discovered.templates, &directory),
            declaration_sources: vec![DeclarationSource::Manifest(manifest.clone())],
            kind: ScopeKind::Manifest,
            directory,
        });
    }

    plans.sort_by(|a, b| {
        a.directory
            .cmp(&b.directory)
            .then_with(|| a.kind.cmp(&b.kind))
    });
    plans
}

fn files_under(source_files: &[PathBuf], directory: &Path) -> Vec<PathBuf> {
    source_files
        .iter()
        .filter(|f| f.starts_with(directory))
        .cloned()
        .collect()
}

fn template_for(templates: &[PathBuf], directory: &Path) -> Option<PathBuf> {
    // Lexicographic order puts `.env.example` first when several exist.
    templates
        .iter()
        .find(|t| t.parent() == Some(directory))
        .cloned()
}

/// Render a path relative to the project root as `./a/b.js` with forward
/// slashes, for stable display and comparison across platforms.
pub fn rel_display(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let mut out = String::from(".");
    for component in rel.components() {
        out.push('/');
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    if out == "." {
        out.push('/');
    }
    out
}
