//! Setup wizard for adding Arvee to a host.
//!
//! One `user` step with an empty form. Submitting it creates a config entry
//! titled "Arvee" when a lookup backend was selected at startup.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::host::ConfigEntries;
use crate::lookup::SelectedBackend;
use crate::{DEFAULT_NAME, DOMAIN};

pub const STEP_USER: &str = "user";

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("No timezone finder library available")]
    CannotConnect,

    #[error("{0}")]
    Unknown(String),
}

impl FlowError {
    /// The translation key shown in the form's `base` error slot.
    pub fn key(&self) -> &'static str {
        match self {
            Self::CannotConnect => "cannot_connect",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Outcome of a flow step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowResult {
    Form {
        step_id: &'static str,
        /// Field names of the form; always empty for this flow.
        data_schema: Vec<String>,
        errors: BTreeMap<String, String>,
    },
    CreateEntry {
        title: String,
        entry_id: String,
        data: Map<String, Value>,
    },
}

pub struct ConfigFlow<'a> {
    backend: Option<&'a SelectedBackend>,
    entries: &'a ConfigEntries,
}

impl<'a> ConfigFlow<'a> {
    /// `backend` is the selection made at startup; the flow never selects again.
    pub fn new(backend: Option<&'a SelectedBackend>, entries: &'a ConfigEntries) -> Self {
        Self { backend, entries }
    }

    /// Handle the initial step. `None` shows the form; `Some` submits it.
    pub async fn step_user(&self, user_input: Option<Map<String, Value>>) -> FlowResult {
        let mut errors = BTreeMap::new();

        if let Some(input) = user_input {
            match self.validate_input() {
                Ok(title) => match self.entries.create(DOMAIN, &title, input).await {
                    Ok(entry) => {
                        log::info!("Created config entry {} ({})", entry.entry_id, entry.title);
                        crate::component::setup_entry(&entry);
                        return FlowResult::CreateEntry {
                            title: entry.title,
                            entry_id: entry.entry_id,
                            data: entry.data,
                        };
                    }
                    Err(e) => {
                        log::error!("Unexpected exception while creating entry: {}", e);
                        errors.insert("base".to_string(), FlowError::Unknown(e.to_string()).key().to_string());
                    }
                },
                Err(e) => {
                    log::warn!("Setup validation failed: {}", e);
                    errors.insert("base".to_string(), e.key().to_string());
                }
            }
        }

        FlowResult::Form {
            step_id: STEP_USER,
            data_schema: Vec::new(),
            errors,
        }
    }

    fn validate_input(&self) -> Result<String, FlowError> {
        match self.backend {
            Some(backend) => {
                log::debug!("Setup validated with {} backend", backend.kind());
                Ok(DEFAULT_NAME.to_string())
            }
            None => Err(FlowError::CannotConnect),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{BackendKind, TimezoneLookup};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct Nowhere;

    impl TimezoneLookup for Nowhere {
        fn kind(&self) -> BackendKind {
            BackendKind::Custom
        }

        fn resolve(&self, _latitude: f64, _longitude: f64) -> Option<String> {
            None
        }
    }

    fn backend() -> SelectedBackend {
        SelectedBackend::new(Arc::new(Nowhere))
    }

    #[tokio::test]
    async fn test_show_form() {
        let dir = TempDir::new().unwrap();
        let entries = ConfigEntries::load(dir.path());
        let backend = backend();
        let flow = ConfigFlow::new(Some(&backend), &entries);

        let result = flow.step_user(None).await;
        assert_eq!(
            result,
            FlowResult::Form {
                step_id: STEP_USER,
                data_schema: vec![],
                errors: BTreeMap::new(),
            }
        );
        assert!(entries.entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_entry() {
        let dir = TempDir::new().unwrap();
        let entries = ConfigEntries::load(dir.path());
        let backend = backend();
        let flow = ConfigFlow::new(Some(&backend), &entries);

        match flow.step_user(Some(Map::new())).await {
            FlowResult::CreateEntry { title, data, .. } => {
                assert_eq!(title, "Arvee");
                assert!(data.is_empty());
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(entries.entries_for(DOMAIN).await.len(), 1);
    }

    #[tokio::test]
    async fn test_cannot_connect_without_backend() {
        let dir = TempDir::new().unwrap();
        let entries = ConfigEntries::load(dir.path());
        let flow = ConfigFlow::new(None, &entries);

        match flow.step_user(Some(Map::new())).await {
            FlowResult::Form { errors, .. } => {
                assert_eq!(errors.get("base").map(String::as_str), Some("cannot_connect"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(entries.entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_when_entry_store_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config_entries.json");
        fs::create_dir_all(&path).unwrap();
        let entries = ConfigEntries::load_from(path);
        let backend = backend();
        let flow = ConfigFlow::new(Some(&backend), &entries);

        match flow.step_user(Some(Map::new())).await {
            FlowResult::Form { errors, .. } => {
                assert_eq!(errors.get("base").map(String::as_str), Some("unknown"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
