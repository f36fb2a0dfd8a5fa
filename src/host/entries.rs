//! Config entries created by the setup wizard, stored at ~/.arvee/config_entries.json.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::config::HostConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub entry_id: String,
    pub domain: String,
    pub title: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub struct ConfigEntries {
    path: PathBuf,
    entries: Mutex<Vec<ConfigEntry>>,
}

impl ConfigEntries {
    pub fn load(home: &Path) -> Self {
        Self::load_from(home.join("config_entries.json"))
    }

    /// Load from a specific path (for testing).
    pub fn load_from(path: PathBuf) -> Self {
        let entries = fs::read_to_string(&path)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default();
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub async fn entries(&self) -> Vec<ConfigEntry> {
        self.entries.lock().await.clone()
    }

    pub async fn entries_for(&self, domain: &str) -> Vec<ConfigEntry> {
        self.entries
            .lock()
            .await
            .iter()
            .filter(|e| e.domain == domain)
            .cloned()
            .collect()
    }

    /// Create and persist a new entry. Nothing is kept in memory if the write fails.
    pub async fn create(
        &self,
        domain: &str,
        title: &str,
        data: Map<String, Value>,
    ) -> Result<ConfigEntry, HostConfigError> {
        let now = chrono::Utc::now();
        let entry = ConfigEntry {
            entry_id: uuid::Uuid::new_v4().simple().to_string(),
            domain: domain.to_string(),
            title: title.to_string(),
            data,
            created_at: now,
        };

        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        next.push(entry.clone());
        self.persist(&next).await?;
        *entries = next;
        Ok(entry)
    }

    async fn persist(&self, entries: &[ConfigEntry]) -> Result<(), HostConfigError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}
