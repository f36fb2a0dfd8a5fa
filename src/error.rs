//! Errors surfaced to service callers.

use thiserror::Error;

use crate::executor::ExecutorError;
use crate::host::config::HostConfigError;
use crate::lookup::Coordinate;

#[derive(Error, Debug)]
pub enum ArveeError {
    #[error("No timezone lookup backend is available (build with the `tzf` or `tz-search` feature)")]
    BackendUnavailable,

    #[error("Invalid data for {service}: {message}")]
    Validation { service: String, message: String },

    #[error("Service {domain}.{service} not found")]
    ServiceNotFound { domain: String, service: String },

    #[error("Could not determine timezone for coordinates: {latitude}, {longitude}")]
    Resolution { latitude: f64, longitude: f64 },

    #[error("Timezone lookup for coordinates {latitude}, {longitude} failed: {source}")]
    LookupFailed {
        latitude: f64,
        longitude: f64,
        #[source]
        source: ExecutorError,
    },

    #[error("{}", update_message(.timezone, .coordinates.as_ref(), .source))]
    ConfigurationUpdate {
        timezone: String,
        coordinates: Option<Coordinate>,
        #[source]
        source: HostConfigError,
    },
}

fn update_message(timezone: &str, coordinates: Option<&Coordinate>, source: &HostConfigError) -> String {
    match coordinates {
        Some(point) => format!(
            "Failed to set geo timezone to {} for coordinates {}: {}",
            timezone, point, source
        ),
        None => format!("Failed to set timezone to {}: {}", timezone, source),
    }
}
