use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Where the task snapshot lives
    pub data_file: PathBuf,

    /// Default export target (extension follows the chosen format)
    pub export_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("taskdeck");

        Self {
            data_file: data_dir.join("tasks.json"),
            export_file: PathBuf::from("todo_summary.pdf"),
        }
    }
}

impl AppConfig {
    /// Load configuration, falling back to defaults when no config file exists.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Config {} is not valid", path.display()))?;
        Ok(config)
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("taskdeck").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.data_file.ends_with("tasks.json"));
        assert_eq!(config.export_file, PathBuf::from("todo_summary.pdf"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "data_file = \"/tmp/mine.json\"\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.data_file, PathBuf::from("/tmp/mine.json"));
        // Unset keys keep their defaults
        assert_eq!(config.export_file, PathBuf::from("todo_summary.pdf"));
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "data_file = [nonsense").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
    }
}
