// Application state module
// Immutable per-process state shared by every connection

use crate::handler::{Dispatcher, HtmlRewrite};
use crate::http::MimeTable;

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Build state with the `.html` rewrite hook and the configured MIME overrides
    pub fn new(config: Config) -> Self {
        let mime = MimeTable::new(config.mime.clone());
        let dispatcher = Dispatcher::new(config.server.root.clone(), mime, HtmlRewrite);
        Self { config, dispatcher }
    }

    /// Build state around an already constructed dispatcher
    pub const fn with_dispatcher(config: Config, dispatcher: Dispatcher) -> Self {
        Self { config, dispatcher }
    }
}
