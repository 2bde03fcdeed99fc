use crate::config::Config;
use crate::store::DocumentStore;
use std::sync::Arc;

/// Shared application state
///
/// `store` is fixed at startup. `None` means the service runs without
/// persistence; each endpoint decides how to degrade.
#[derive(Clone)]
pub struct AppState {
    pub store: Option<Arc<dyn DocumentStore>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn DocumentStore>>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
