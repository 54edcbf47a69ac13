//! Configuration file support for xcgen.
//!
//! xcgen supports two configuration file locations:
//! - Global: `~/.xcgen/config.toml` - User-wide defaults
//! - Project: `.xcgen/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Command-line flags
//! take precedence over both.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// xcgen configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Focus settings
    pub focus: FocusConfig,

    /// Output settings
    pub output: OutputConfig,
}

/// Which part of the target universe to generate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Labels to focus on; empty means everything
    pub labels: Vec<String>,
}

/// How plans are printed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format (human, json)
    pub format: Option<String>,
}

/// Plan output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => bail!("unknown output format `{}` (expected `human` or `json`)", other),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if !other.focus.labels.is_empty() {
            self.focus.labels = other.focus.labels;
        }
        if other.output.format.is_some() {
            self.output.format = other.output.format;
        }
    }

    /// Parse the output format, warning on unknown values.
    pub fn output_format(&self) -> OutputFormat {
        match self.output.format.as_deref().map(str::parse::<OutputFormat>) {
            Some(Ok(format)) => format,
            Some(Err(e)) => {
                tracing::warn!("{:#}", e);
                OutputFormat::default()
            }
            None => OutputFormat::default(),
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.xcgen/config.toml)
/// 2. Global config (~/.xcgen/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global xcgen config directory (~/.xcgen).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".xcgen"))
}

/// Get the global config path (~/.xcgen/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.xcgen/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".xcgen").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.focus.labels.is_empty());
        assert_eq!(config.output_format(), OutputFormat::Human);
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[focus]
labels = ["//app:App"]

[output]
format = "json"
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.focus.labels, vec!["//app:App".to_string()]);
        assert_eq!(config.output_format(), OutputFormat::Json);
    }

    #[test]
    fn test_malformed_config_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[focus\nlabels = 3").unwrap();

        assert!(Config::load(&config_path).is_err());
        let config = Config::load_or_default(&config_path);
        assert!(config.focus.labels.is_empty());
    }

    #[test]
    fn test_unknown_format_is_human() {
        let mut config = Config::default();
        config.output.format = Some("yaml".to_string());
        assert_eq!(config.output_format(), OutputFormat::Human);
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
[focus]
labels = ["//a:A"]

[output]
format = "json"
"#,
        )
        .unwrap();

        std::fs::write(
            &project_path,
            r#"
[focus]
labels = ["//b:B"]
"#,
        )
        .unwrap();

        let config = load_config(Some(&global_path), &project_path);

        // Project focus overrides global
        assert_eq!(config.focus.labels, vec!["//b:B".to_string()]);
        // Global format is preserved
        assert_eq!(config.output_format(), OutputFormat::Json);
    }

    #[test]
    fn test_load_config_missing_files() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(None, &project_config_path(tmp.path()));
        assert!(config.focus.labels.is_empty());
    }
}
