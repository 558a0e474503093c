use std::sync::Arc;

use mecab_api_core::dispatch::Dispatcher;
use mecab_api_core::registry::Registry;

/// Shared, read-only state of the HTTP handlers
pub struct AppState {
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(registry: Registry) -> Self {
        Self {
            dispatcher: Dispatcher::new(Arc::new(registry)),
        }
    }
}
