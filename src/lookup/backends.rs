//! Adapters over the offline lookup libraries.
//!
//! The two libraries disagree on argument order: `tzf-rs` takes
//! `(longitude, latitude)`, `tz-search` takes `(latitude, longitude)`.
//! Each adapter hides its library's convention behind [`TimezoneLookup::resolve`].
//!
//! Open-ocean answers (`Etc/GMT±N` nautical zones) count as no coverage.

#[cfg(any(feature = "tzf", feature = "tz-search"))]
use super::types::{BackendKind, TimezoneLookup};

#[cfg(any(feature = "tzf", feature = "tz-search"))]
fn is_covered(name: &str) -> bool {
    !name.is_empty() && !name.starts_with("Etc/")
}

// ─── tzf-rs ──────────────────────────────────────────────────────

#[cfg(feature = "tzf")]
pub struct TzfLookup {
    finder: tzf_rs::DefaultFinder,
}

#[cfg(feature = "tzf")]
impl TzfLookup {
    pub fn new() -> Self {
        Self {
            finder: tzf_rs::DefaultFinder::new(),
        }
    }
}

#[cfg(feature = "tzf")]
impl Default for TzfLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "tzf")]
impl TimezoneLookup for TzfLookup {
    fn kind(&self) -> BackendKind {
        BackendKind::Tzf
    }

    fn resolve(&self, latitude: f64, longitude: f64) -> Option<String> {
        // longitude first
        let name = self.finder.get_tz_name(longitude, latitude);
        is_covered(name).then(|| name.to_string())
    }
}

// ─── tz-search ───────────────────────────────────────────────────

#[cfg(feature = "tz-search")]
#[derive(Default)]
pub struct TzSearchLookup;

#[cfg(feature = "tz-search")]
impl TimezoneLookup for TzSearchLookup {
    fn kind(&self) -> BackendKind {
        BackendKind::TzSearch
    }

    fn resolve(&self, latitude: f64, longitude: f64) -> Option<String> {
        // latitude first
        tz_search::lookup(latitude, longitude).filter(|name| is_covered(name))
    }
}


#[cfg(all(test, feature = "tz-search"))]
mod tz_search_tests {
    use super::*;

    #[test]
    fn test_tz_search_denver() {
        assert_eq!(TzSearchLookup.resolve(40.0, -105.0).as_deref(), Some("America/Denver"));
    }

    #[test]
    fn test_tz_search_argument_order() {
        // Swapped, the pair lands in the Arabian Sea.
        assert_ne!(TzSearchLookup.resolve(18.0686, 59.3293).as_deref(), Some("Europe/Stockholm"));
    }

    #[test]
    fn test_tz_search_covers_line_islands_waters() {
        // tz-search's polygons reach this point, unlike tzf-rs.
        assert_eq!(TzSearchLookup.resolve(0.0, -160.0).as_deref(), Some("Pacific/Kiritimati"));
    }
}
