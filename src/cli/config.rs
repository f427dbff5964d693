// ABOUTME: Configuration management for the stencil step runner
// ABOUTME: Handles loading runner settings from a YAML configuration file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    #[serde(default)]
    pub sandbox: SandboxConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SandboxConfig {
    /// Operations permitted in addition to the standard allowlist
    #[serde(default)]
    pub allow: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

fn default_cache_capacity() -> usize {
    64
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            sandbox: SandboxConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.cache_capacity, 64);
        assert!(config.sandbox.allow.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_partial_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stencil.yaml");
        fs::write(
            &path,
            "cache_capacity: 8\nsandbox:\n  allow:\n    - env\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.cache_capacity, 8);
        assert_eq!(config.sandbox.allow, vec!["env"]);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(&dir.path().join("absent.yaml")).is_err());
    }
}
