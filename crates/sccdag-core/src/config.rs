//! Layered TOML configuration.
//!
//! Resolution order (first found wins, whole file):
//!
//! 1. `<project>/.sccdag/config.toml`
//! 2. `<config_dir>/sccdag/config.toml` (per-user, via `dirs`)
//! 3. built-in defaults
//!
//! Command-line flags override whatever is resolved here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::graph::topo::TopoAlgorithm;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub topo: TopoConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub generate: GenerateConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopoConfig {
    /// Ordering shown in reports. Path solvers always validate with Kahn.
    #[serde(default)]
    pub algorithm: TopoAlgorithm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Decimal places used when printing distances.
    #[serde(default = "default_precision")]
    pub precision: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            output_dir: default_output_dir(),
        }
    }
}

const fn default_precision() -> usize {
    2
}

const fn default_seed() -> u64 {
    42
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Path of the project-level config file under `project_root`.
#[must_use]
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".sccdag/config.toml")
}

/// Path of the per-user config file, if a config directory exists.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sccdag/config.toml"))
}

/// Parse a config file, or return `None` if it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_file(path: &Path) -> Result<Option<AnalysisConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<AnalysisConfig>(&content)
        .map(Some)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve the effective configuration for `project_root`.
///
/// # Errors
///
/// Returns an error if a config file that exists fails to read or parse.
pub fn load_effective_config(project_root: &Path) -> Result<AnalysisConfig> {
    if let Some(config) = load_config_file(&project_config_path(project_root))? {
        tracing::debug!(root = %project_root.display(), "using project config");
        return Ok(config);
    }

    if let Some(path) = user_config_path() {
        if let Some(config) = load_config_file(&path)? {
            tracing::debug!(path = %path.display(), "using user config");
            return Ok(config);
        }
    }

    Ok(AnalysisConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_stable() {
        let config = AnalysisConfig::default();
        assert_eq!(config.topo.algorithm, TopoAlgorithm::Kahn);
        assert_eq!(config.report.precision, 2);
        assert_eq!(config.generate.seed, 42);
        assert_eq!(config.generate.output_dir, PathBuf::from("data"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: AnalysisConfig = toml::from_str("[topo]\nalgorithm = \"dfs\"\n").expect("parse");
        assert_eq!(config.topo.algorithm, TopoAlgorithm::Dfs);
        assert_eq!(config.report.precision, 2);
    }

    #[test]
    fn project_file_is_loaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = project_config_path(dir.path());
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, "[report]\nprecision = 4\n[generate]\nseed = 7\n").expect("write");

        let config = load_effective_config(dir.path()).expect("load");
        assert_eq!(config.report.precision, 4);
        assert_eq!(config.generate.seed, 7);
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = load_config_file(&dir.path().join("absent.toml")).expect("no error");
        assert!(loaded.is_none());
    }

    #[test]
    fn invalid_file_is_an_error_with_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[topo]\nalgorithm = \"bogus\"\n").expect("write");

        let err = load_config_file(&path).expect_err("should fail");
        assert!(err.to_string().contains("Failed to parse"));
    }
}
