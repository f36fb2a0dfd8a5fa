use crate::host::Host;
use crate::lookup::SelectedBackend;

pub struct AppState {
    pub host: Host,
    /// Backend chosen at startup; `None` when setup failed.
    pub backend: Option<SelectedBackend>,
}
