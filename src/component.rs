//! The Arvee component: timezone services for mobile installations.
//!
//! `set_timezone` applies an IANA name directly; `set_geo_timezone` resolves a
//! coordinate through the selected offline backend first.

use futures::FutureExt;
use std::sync::Arc;

use crate::error::ArveeError;
use crate::executor::Executor;
use crate::host::services::{Field, FieldKind, ServiceSchema};
use crate::host::{ConfigEntry, Host, HostConfig};
use crate::lookup::{Coordinate, SelectedBackend};
use crate::{DOMAIN, SERVICE_SET_GEO_TIMEZONE, SERVICE_SET_TIMEZONE};

pub const ATTR_TIMEZONE: &str = "timezone";
pub const ATTR_LATITUDE: &str = "latitude";
pub const ATTR_LONGITUDE: &str = "longitude";

pub fn set_timezone_schema() -> ServiceSchema {
    ServiceSchema::new(vec![Field::required(ATTR_TIMEZONE, FieldKind::String)])
}

pub fn set_geo_timezone_schema() -> ServiceSchema {
    ServiceSchema::new(vec![
        Field::required(ATTR_LATITUDE, FieldKind::Latitude),
        Field::required(ATTR_LONGITUDE, FieldKind::Longitude),
    ])
}

/// Applies timezone changes to the host configuration.
#[derive(Clone)]
pub struct Arvee {
    config: Arc<dyn HostConfig>,
    executor: Executor,
    backend: SelectedBackend,
}

impl Arvee {
    pub fn new(config: Arc<dyn HostConfig>, executor: Executor, backend: SelectedBackend) -> Self {
        Self { config, executor, backend }
    }

    pub fn backend(&self) -> &SelectedBackend {
        &self.backend
    }

    /// Set the host timezone by IANA name.
    pub async fn apply_named_timezone(&self, timezone: &str) -> Result<(), ArveeError> {
        if let Err(source) = self.config.update_time_zone(timezone).await {
            log::error!("Error setting timezone to {}: {}", timezone, source);
            return Err(ArveeError::ConfigurationUpdate {
                timezone: timezone.to_string(),
                coordinates: None,
                source,
            });
        }
        log::info!("Timezone updated to: {}", timezone);
        Ok(())
    }

    /// Resolve `(latitude, longitude)` to a zone and set it. Returns the applied zone.
    pub async fn apply_timezone_for_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<String, ArveeError> {
        let point = Coordinate::new(latitude, longitude).map_err(|message| ArveeError::Validation {
            service: format!("{}.{}", DOMAIN, SERVICE_SET_GEO_TIMEZONE),
            message,
        })?;

        let lookup = self.backend.lookup();
        let resolved = self
            .executor
            .run(move || lookup.resolve(point.latitude, point.longitude))
            .await
            .map_err(|source| {
                log::error!("Error setting timezone for coordinates {}: {}", point, source);
                ArveeError::LookupFailed { latitude, longitude, source }
            })?;

        let timezone = match resolved {
            Some(tz) => tz,
            None => {
                log::error!("Could not determine timezone for coordinates: {}", point);
                return Err(ArveeError::Resolution { latitude, longitude });
            }
        };

        if let Err(source) = self.config.update_time_zone(&timezone).await {
            log::error!(
                "Error setting timezone for coordinates {} to {}: {}",
                point, timezone, source
            );
            return Err(ArveeError::ConfigurationUpdate {
                timezone,
                coordinates: Some(point),
                source,
            });
        }

        log::info!("Timezone updated to: {} for coordinates: {}", timezone, point);
        Ok(timezone)
    }
}

/// Register the component's services with the host.
///
/// Returns `false`, registering nothing, when no lookup backend is available.
pub fn setup(host: &Host, backend: Option<SelectedBackend>) -> bool {
    match try_setup(host, backend) {
        Ok(_) => true,
        Err(err) => {
            log::error!("Setup of {} failed: {}", DOMAIN, err);
            false
        }
    }
}

/// Like [`setup`], but returns the component handle or the reason it failed.
pub fn try_setup(host: &Host, backend: Option<SelectedBackend>) -> Result<Arvee, ArveeError> {
    let backend = backend.ok_or(ArveeError::BackendUnavailable)?;
    let arvee = Arvee::new(Arc::clone(&host.config), host.executor.clone(), backend);

    let component = arvee.clone();
    host.services.register(DOMAIN, SERVICE_SET_TIMEZONE, set_timezone_schema(), move |call| {
        let component = component.clone();
        async move {
            let timezone = call.get_str(ATTR_TIMEZONE).unwrap_or_default().to_string();
            component.apply_named_timezone(&timezone).await
        }
        .boxed()
    });

    let component = arvee.clone();
    host.services.register(DOMAIN, SERVICE_SET_GEO_TIMEZONE, set_geo_timezone_schema(), move |call| {
        let component = component.clone();
        async move {
            let latitude = call.get_f64(ATTR_LATITUDE).unwrap_or(f64::NAN);
            let longitude = call.get_f64(ATTR_LONGITUDE).unwrap_or(f64::NAN);
            component
                .apply_timezone_for_coordinates(latitude, longitude)
                .await
                .map(|_| ())
        }
        .boxed()
    });

    Ok(arvee)
}

/// Set up a config entry created by the wizard. Nothing to do beyond acknowledging it.
pub fn setup_entry(entry: &ConfigEntry) -> bool {
    log::debug!("Setting up config entry {} ({})", entry.entry_id, entry.title);
    true
}

pub fn unload_entry(entry: &ConfigEntry) -> bool {
    log::debug!("Unloading config entry {} ({})", entry.entry_id, entry.title);
    true
}
