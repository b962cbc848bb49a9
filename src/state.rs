//! Shared application state

use std::sync::Arc;

use crate::config::Config;

/// State handed to every request handler
#[derive(Debug, Clone)]
pub struct AppState {
    /// Configuration loaded at startup
    pub config: Config,
}

impl AppState {
    /// Create state from a loaded configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

/// Handle type stored in the router
pub type SharedState = Arc<AppState>;
