//! Offline coordinate → timezone lookup.
//!
//! Provides the lookup capability trait, adapters over the `tzf-rs` and
//! `tz-search` libraries, and the once-at-startup backend selection.

pub mod backends;
pub mod selector;
pub mod types;

pub use selector::{BackendSelector, Candidate, SelectedBackend};
pub use types::{BackendKind, Coordinate, TimezoneLookup};
