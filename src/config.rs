use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::scope::DEFAULT_SOURCE_EXTENSIONS;

pub const CONFIG_FILE_NAME: &str = ".envauditrc.json";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Variable names never reported as missing, in addition to the built-in
    /// known-variable registry.
    #[serde(default)]
    pub ignore_vars: Vec<String>,
    /// Exclusion patterns: plain names exclude a directory segment anywhere,
    /// wildcard patterns are matched against relative paths verbatim.
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    /// Evaluate every name, including allowlisted ones.
    #[serde(default)]
    pub strict_mode: bool,
    /// Grade severity by whether a usage site has a safe fallback.
    #[serde(default = "default_detect_fallbacks")]
    pub detect_fallbacks: bool,
    /// Source file extensions handed to the extractor.
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,
}

fn default_detect_fallbacks() -> bool {
    true
}

fn default_source_extensions() -> Vec<String> {
    DEFAULT_SOURCE_EXTENSIONS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore_vars: Vec::new(),
            exclude_globs: Vec::new(),
            strict_mode: false,
            detect_fallbacks: default_detect_fallbacks(),
            source_extensions: default_source_extensions(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any wildcard pattern in `excludeGlobs` is invalid.
    /// Patterns without wildcards are literal directory names and need no
    /// validation.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.exclude_globs {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'excludeGlobs': \"{}\"", pattern)
                })?;
            }
        }
        Ok(())
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_vars.iter().any(|v| v == name)
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
    /// Set when a config file existed but could not be used; the run
    /// proceeds with defaults rather than aborting.
    pub warning: Option<String>,
}

/// Load configuration from `start_dir`, walking up to the repository root.
///
/// A malformed config file is a recoverable condition: the defaults are used
/// and the problem is surfaced as a warning.
pub fn load_config(start_dir: &Path) -> ConfigLoadResult {
    let Some(path) = find_config_file(start_dir) else {
        return ConfigLoadResult {
            config: Config::default(),
            from_file: false,
            warning: None,
        };
    };

    let fallback = |message: String| ConfigLoadResult {
        config: Config::default(),
        from_file: false,
        warning: Some(message),
    };

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => return fallback(format!("Failed to read {}: {}", path.display(), err)),
    };
    let config: Config = match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(err) => return fallback(format!("Failed to parse {}: {}", path.display(), err)),
    };
    if let Err(err) = config.validate() {
        return fallback(format!("Invalid config {}: {}", path.display(), err));
    }

    ConfigLoadResult {
        config,
        from_file: true,
        warning: None,
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use tempfile::tempdir;

    use crate::config::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.ignore_vars.is_empty());
        assert!(config.exclude_globs.is_empty());
        assert!(!config.strict_mode);
        assert!(config.detect_fallbacks);
        assert!(config.source_extensions.contains(&"ts".to_string()));
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "ignoreVars": ["LEGACY_FLAG"],
              "excludeGlobs": ["**/dist/**", "coverage"],
              "strictMode": true,
              "detectFallbacks": false
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.ignore_vars, vec!["LEGACY_FLAG"]);
        assert_eq!(config.exclude_globs, vec!["**/dist/**", "coverage"]);
        assert!(config.strict_mode);
        assert!(!config.detect_fallbacks);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let json = r#"{ "ignoreVars": ["X_CUSTOM"] }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.ignore_vars, vec!["X_CUSTOM"]);
        assert!(config.detect_fallbacks);
        assert_eq!(config.source_extensions, default_source_extensions());
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("src").join("handlers");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        let found = find_config_file(&sub_dir);
        assert_eq!(found.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        assert!(find_config_file(dir.path()).is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "ignoreVars": ["LEGACY"] }"#,
        )
        .unwrap();

        let result = load_config(dir.path());
        assert!(result.from_file);
        assert!(result.warning.is_none());
        assert_eq!(result.config.ignore_vars, vec!["LEGACY"]);
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path());
        assert!(!result.from_file);
        assert!(result.config.ignore_vars.is_empty());
    }

    #[test]
    fn test_malformed_config_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();

        let result = load_config(dir.path());
        assert!(!result.from_file);
        assert!(result.warning.is_some());
        assert!(result.config.detect_fallbacks);
    }

    #[test]
    fn test_invalid_glob_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "excludeGlobs": ["**/[invalid"] }"#,
        )
        .unwrap();

        let result = load_config(dir.path());
        assert!(!result.from_file);
        assert!(result.warning.unwrap().contains("excludeGlobs"));
    }

    #[test]
    fn test_validate_plain_name_is_not_a_glob() {
        // Literal directory names without wildcards pass through untouched.
        let config = Config {
            exclude_globs: vec!["build".to_string(), "**/generated/**".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_is_ignored() {
        let config = Config {
            ignore_vars: vec!["LEGACY".to_string()],
            ..Default::default()
        };
        assert!(config.is_ignored("LEGACY"));
        assert!(!config.is_ignored("OTHER"));
    }
}
