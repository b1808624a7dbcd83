//! Ingestion of failure reports
//!
//! `IngestService` is the only way events enter the store: it validates the
//! body, checks the shared secret, then inserts in a single transaction.

mod token;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{FlowWatchError, FlowWatchResult};
use crate::event_store::EventStore;
use crate::types::NewEvent;
use crate::validation::validate_new_event;

pub use token::IngestToken;

/// Success response of the webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingested {
    pub id: u64,
    pub status: String,
}

impl Ingested {
    fn stored(id: u64) -> Self {
        Self {
            id,
            status: "stored".to_string(),
        }
    }
}

pub struct IngestService {
    store: Arc<EventStore>,
    token: IngestToken,
}

impl IngestService {
    pub fn new(store: Arc<EventStore>, token: IngestToken) -> Self {
        if !token.is_configured() {
            warn!("no ingestion token configured, every webhook call will be rejected");
        }
        Self { store, token }
    }

    /// Validate, authenticate and store one failure report
    ///
    /// The body is validated before the token is checked, so a malformed
    /// body is always a validation error. Nothing is stored on any error.
    pub fn ingest(&self, token: Option<&str>, candidate: NewEvent) -> FlowWatchResult<Ingested> {
        let event = validate_new_event(candidate).map_err(|e| {
            warn!(error = %e, "rejected failure report");
            e
        })?;

        if !self.token.verify(token) {
            warn!(token_present = token.is_some(), "rejected failure report: invalid token");
            return Err(FlowWatchError::Unauthorized);
        }

        let stored = self.store.insert(event)?;
        info!(
            id = stored.id,
            workflow = stored.workflow_name.as_deref().unwrap_or("-"),
            "failure report stored"
        );

        Ok(Ingested::stored(stored.id))
    }
}
