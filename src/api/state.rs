//! Shared application state for the HTTP handlers

use std::sync::Arc;

use crate::config::Config;
use crate::event_store::EventStore;
use crate::ingest::IngestService;
use crate::query::QueryService;

/// Everything a request handler may touch
pub struct AppState {
    pub ingest: IngestService,
    pub query: QueryService,
    /// Dashboard title
    pub title: String,
}

impl AppState {
    /// Wire the services over one shared store
    pub fn new(store: Arc<EventStore>, config: &Config) -> Self {
        Self {
            ingest: IngestService::new(store.clone(), config.token.clone()),
            query: QueryService::new(store),
            title: config.app_title.clone(),
        }
    }
}
