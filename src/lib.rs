//! Arvee: timezone services for mobile installations (RVs, boats, vans).
//!
//! Sets the host's active timezone either by IANA name or from coordinates,
//! using an offline point-in-polygon lookup.

pub mod component;
pub mod config_flow;
pub mod error;
pub mod executor;
pub mod host;
pub mod lookup;
pub mod server;
pub mod settings;

pub use component::{setup, try_setup, Arvee};
pub use error::ArveeError;

pub const DOMAIN: &str = "arvee";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DEFAULT_NAME: &str = "Arvee";

pub const SERVICE_SET_TIMEZONE: &str = "set_timezone";
pub const SERVICE_SET_GEO_TIMEZONE: &str = "set_geo_timezone";
