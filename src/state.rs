// src/state.rs
use std::sync::Arc;

use crate::config::Config;
use crate::services::flow::FlowClient;
use crate::services::session_manager::SessionManager;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub sessions: SessionManager,
    pub flow: FlowClient,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            sessions: SessionManager::new(config.session_ttl),
            flow: FlowClient::new(config),
        }
    }
}
