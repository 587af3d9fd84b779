use crate::error::{ReadlogError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DATABASE_FILE: &str = "readlog.db";
const DEFAULT_SUGGESTION_LIMIT: usize = 8;

/// Configuration for readlog, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadlogConfig {
    /// Database file name, relative to the data directory
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// Vibes offered as suggestions before anyone has used them
    #[serde(default = "default_suggested_vibes")]
    pub suggested_vibes: Vec<String>,

    /// How many suggestions to show at most
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
}

fn default_database_file() -> String {
    DEFAULT_DATABASE_FILE.to_string()
}

fn default_suggestion_limit() -> usize {
    DEFAULT_SUGGESTION_LIMIT
}

fn default_suggested_vibes() -> Vec<String> {
    [
        "Cozy",
        "Dark",
        "Funny",
        "Heartbreaking",
        "Hopeful",
        "Mind-bending",
        "Page-turner",
        "Romantic",
        "Slow burn",
        "Spooky",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for ReadlogConfig {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            suggested_vibes: default_suggested_vibes(),
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }
}

impl ReadlogConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        serde_json::from_str(&content)
            .map_err(|e| ReadlogError::Config(format!("{}: {}", config_path.display(), e)))
    }

    /// Absolute location of the database for a data directory.
    pub fn database_path<P: AsRef<Path>>(&self, data_dir: P) -> PathBuf {
        let file = Path::new(&self.database_file);
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            data_dir.as_ref().join(file)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ReadlogConfig::default();
        assert_eq!(config.database_file, "readlog.db");
        assert_eq!(config.suggestion_limit, 8);
        assert!(config.suggested_vibes.contains(&"Cozy".to_string()));
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = ReadlogConfig::load(dir.path()).unwrap();
        assert_eq!(config, ReadlogConfig::default());
    }

    #[test]
    fn test_written_config_is_loaded() {
        let dir = TempDir::new().unwrap();
        let config = ReadlogConfig {
            suggestion_limit: 3,
            ..Default::default()
        };
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            serde_json::to_string_pretty(&config).unwrap(),
        )
        .unwrap();

        let loaded = ReadlogConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.suggestion_limit, 3);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"suggestion_limit": 2}"#).unwrap();

        let loaded = ReadlogConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.suggestion_limit, 2);
        assert_eq!(loaded.database_file, "readlog.db");
    }

    #[test]
    fn test_malformed_file_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{").unwrap();
        assert!(matches!(
            ReadlogConfig::load(dir.path()),
            Err(ReadlogError::Config(_))
        ));
    }

    #[test]
    fn test_database_path_is_relative_to_data_dir() {
        let config = ReadlogConfig::default();
        assert_eq!(
            config.database_path("/data"),
            PathBuf::from("/data/readlog.db")
        );
    }
}
