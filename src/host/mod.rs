//! The pieces of the automation host this component plugs into.
//!
//! Host configuration state, the service registry, the blocking executor, and
//! the config-entry store, bundled as [`Host`].

pub mod config;
pub mod entries;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::executor::Executor;

pub use config::{FileConfig, HostConfig, HostConfigError};
pub use entries::{ConfigEntries, ConfigEntry};
pub use services::{ServiceCall, ServiceRegistry, ServiceSchema};

pub struct Host {
    pub config: Arc<dyn HostConfig>,
    pub services: ServiceRegistry,
    pub executor: Executor,
    pub entries: ConfigEntries,
}

impl Host {
    pub fn new(config: Arc<dyn HostConfig>, executor: Executor, entries: ConfigEntries) -> Self {
        Self {
            config,
            services: ServiceRegistry::new(),
            executor,
            entries,
        }
    }

    /// A host whose state lives under `home` (core.json, config_entries.json).
    pub fn open(home: &Path, executor: Executor) -> Self {
        Self::new(
            Arc::new(FileConfig::load(home)),
            executor,
            ConfigEntries::load(home),
        )
    }
}

/// Default state directory (~/.arvee).
pub fn default_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".arvee")
}
