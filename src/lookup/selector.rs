//! Backend selector. Picks the lookup library once at startup.
//!
//! Order: tzf-rs → tz-search → unavailable

use std::fmt;
use std::sync::Arc;

use super::types::{BackendKind, TimezoneLookup};

/// A candidate backend: returns the capability if it can be acquired.
pub type Candidate = Box<dyn Fn() -> Option<Arc<dyn TimezoneLookup>> + Send + Sync>;

/// The lookup capability chosen for this process. Cheap to clone, read-only.
#[derive(Clone)]
pub struct SelectedBackend {
    lookup: Arc<dyn TimezoneLookup>,
}

impl SelectedBackend {
    pub fn new(lookup: Arc<dyn TimezoneLookup>) -> Self {
        Self { lookup }
    }

    pub fn kind(&self) -> BackendKind {
        self.lookup.kind()
    }

    pub fn lookup(&self) -> Arc<dyn TimezoneLookup> {
        Arc::clone(&self.lookup)
    }
}

impl fmt::Debug for SelectedBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedBackend")
            .field("kind", &self.kind())
            .finish()
    }
}

/// Ordered list of candidate backends, most preferred first.
pub struct BackendSelector {
    candidates: Vec<Candidate>,
}

impl BackendSelector {
    /// Candidates for the backends compiled into this binary.
    pub fn compiled() -> Self {
        #[allow(unused_mut)]
        let mut candidates: Vec<Candidate> = Vec::new();

        #[cfg(feature = "tzf")]
        candidates.push(Box::new(|| {
            Some(Arc::new(super::backends::TzfLookup::new()) as Arc<dyn TimezoneLookup>)
        }));

        #[cfg(feature = "tz-search")]
        candidates.push(Box::new(|| {
            Some(Arc::new(super::backends::TzSearchLookup) as Arc<dyn TimezoneLookup>)
        }));

        Self { candidates }
    }

    /// Create a selector with an explicit candidate list (for testing or embedding).
    pub fn with_candidates(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    /// Walk the candidates in order and keep the first one that is available.
    pub fn select(&self) -> Option<SelectedBackend> {
        let selected = self
            .candidates
            .iter()
            .find_map(|candidate| candidate())
            .map(SelectedBackend::new);

        match &selected {
            Some(backend) => log::info!("Using {} for timezone lookups", backend.kind()),
            None => log::error!(
                "No timezone lookup backend is available. \
                 Rebuild with the `tzf` or `tz-search` feature enabled"
            ),
        }
        selected
    }
}
