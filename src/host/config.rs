//! Host configuration state at ~/.arvee/core.json.
//!
//! The only field this component mutates is `time_zone`. Writes go through a
//! temp file + rename so a failed update never leaves a partial file behind.

use async_trait::async_trait;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;

pub const DEFAULT_TIME_ZONE: &str = "UTC";

#[derive(Error, Debug)]
pub enum HostConfigError {
    #[error("Invalid time zone passed in. Valid options can be found here: https://en.wikipedia.org/wiki/List_of_tz_database_time_zones (got '{0}')")]
    UnknownTimeZone(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The host's global settings, as far as this component is concerned.
#[async_trait]
pub trait HostConfig: Send + Sync {
    async fn time_zone(&self) -> String;

    /// Atomically replace the active time zone. Rejects names the host does not know.
    async fn update_time_zone(&self, time_zone: &str) -> Result<(), HostConfigError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CoreConfig {
    #[serde(default = "default_time_zone")]
    time_zone: String,
    #[serde(default)]
    updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            updated_at: None,
        }
    }
}

/// File-backed host configuration.
pub struct FileConfig {
    path: PathBuf,
    state: Mutex<CoreConfig>,
}

impl FileConfig {
    /// Load from `<home>/core.json`, starting from defaults if it is missing or unreadable.
    pub fn load(home: &Path) -> Self {
        Self::load_from(home.join("core.json"))
    }

    /// Load from a specific path (for testing).
    pub fn load_from(path: PathBuf) -> Self {
        let state = match Self::read_file(&path) {
            Some(config) => config,
            None => {
                log::debug!("No readable host configuration at {}, using defaults", path.display());
                CoreConfig::default()
            }
        };
        Self {
            path,
            state: Mutex::new(state),
        }
    }

    fn read_file(path: &Path) -> Option<CoreConfig> {
        let data = fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }

    async fn persist(&self, config: &CoreConfig) -> Result<(), HostConfigError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl HostConfig for FileConfig {
    async fn time_zone(&self) -> String {
        self.state.lock().await.time_zone.clone()
    }

    async fn update_time_zone(&self, time_zone: &str) -> Result<(), HostConfigError> {
        let tz: Tz = time_zone
            .parse()
            .map_err(|_| HostConfigError::UnknownTimeZone(time_zone.to_string()))?;

        let mut state = self.state.lock().await;
        let next = CoreConfig {
            time_zone: tz.name().to_string(),
            updated_at: Some(chrono::Utc::now()),
        };
        self.persist(&next).await?;
        *state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config() -> (FileConfig, TempDir) {
        let dir = TempDir::new().unwrap();
        (FileConfig::load(dir.path()), dir)
    }

    #[tokio::test]
    async fn test_defaults_to_utc() {
        let (config, _dir) = test_config();
        assert_eq!(config.time_zone().await, "UTC");
    }

    #[tokio::test]
    async fn test_update_and_reload() {
        let (config, dir) = test_config();
        config.update_time_zone("America/Denver").await.unwrap();
        assert_eq!(config.time_zone().await, "America/Denver");

        let reloaded = FileConfig::load(dir.path());
        assert_eq!(reloaded.time_zone().await, "America/Denver");
    }

    #[tokio::test]
    async fn test_rejects_unknown_zone() {
        let (config, dir) = test_config();
        config.update_time_zone("Europe/Oslo").await.unwrap();

        let err = config.update_time_zone("Mars/Olympus_Mons").await.unwrap_err();
        assert!(matches!(err, HostConfigError::UnknownTimeZone(ref tz) if tz == "Mars/Olympus_Mons"));
        assert_eq!(config.time_zone().await, "Europe/Oslo");
        assert_eq!(FileConfig::load(dir.path()).time_zone().await, "Europe/Oslo");
    }

    #[tokio::test]
    async fn test_unreadable_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("core.json");
        fs::write(&path, "{ not json").unwrap();

        let config = FileConfig::load_from(path);
        assert_eq!(config.time_zone().await, "UTC");
    }

    #[tokio::test]
    async fn test_missing_fields_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("core.json");
        fs::write(&path, r#"{ "time_zone": "Asia/Tokyo" }"#).unwrap();

        let config = FileConfig::load_from(path);
        assert_eq!(config.time_zone().await, "Asia/Tokyo");
    }

    #[tokio::test]
    async fn test_no_temp_file_left() {
        let (config, dir) = test_config();
        config.update_time_zone("Europe/London").await.unwrap();
        assert!(dir.path().join("core.json").exists());
        assert!(!dir.path().join("core.json.tmp").exists());
    }
}
