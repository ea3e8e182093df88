use std::sync::Arc;

use crate::backend::Backend;
use crate::config::AppConfig;

/// Shared, read-only state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<dyn Backend>,
}

impl AppState {
    pub fn new(config: AppConfig, backend: Arc<dyn Backend>) -> Self {
        Self {
            config: Arc::new(config),
            backend,
        }
    }
}
