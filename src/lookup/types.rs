//! Core types for the lookup subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which offline lookup library answered a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendKind {
    /// `tzf-rs`, the preferred backend.
    Tzf,
    /// `tz-search`, used when `tzf-rs` is not compiled in.
    TzSearch,
    /// Anything injected by the embedding application.
    Custom,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tzf => write!(f, "tzf-rs"),
            Self::TzSearch => write!(f, "tz-search"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

/// A validated point on the globe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting anything outside lat -90..90 / lon -180..180.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, String> {
        validate_latitude(latitude)?;
        validate_longitude(longitude)?;
        Ok(Self { latitude, longitude })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

pub fn validate_latitude(latitude: f64) -> Result<f64, String> {
    if (-90.0..=90.0).contains(&latitude) {
        Ok(latitude)
    } else {
        Err(format!("invalid latitude {} (expected -90..90)", latitude))
    }
}

pub fn validate_longitude(longitude: f64) -> Result<f64, String> {
    if (-180.0..=180.0).contains(&longitude) {
        Ok(longitude)
    } else {
        Err(format!("invalid longitude {} (expected -180..180)", longitude))
    }
}

/// A point → zone-name capability.
///
/// Implementations are synchronous and may be CPU-heavy; callers dispatch them
/// through [`crate::executor::Executor`] rather than calling them on the runtime.
pub trait TimezoneLookup: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Resolve a point to an IANA zone name, or `None` when the point is not covered.
    fn resolve(&self, latitude: f64, longitude: f64) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_bounds_inclusive() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_coordinate_out_of_range() {
        assert!(Coordinate::new(90.5, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.1).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_backend_display() {
        assert_eq!(BackendKind::Tzf.to_string(), "tzf-rs");
        assert_eq!(BackendKind::TzSearch.to_string(), "tz-search");
    }
}
