//! Ingestion webhook

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::bad_request;
use crate::api::state::AppState;
use crate::error::FlowWatchError;
use crate::types::NewEvent;

/// Query parameters of the webhook
#[derive(Debug, Deserialize)]
pub struct WebhookParams {
    pub token: Option<String>,
}

/// POST /webhooks/n8n?token=... - Store a workflow failure
///
/// Undecodable bodies are validation errors, same as a missing
/// `error_message`. A query string that cannot be decoded is a 400.
pub async fn n8n_webhook(
    State(state): State<Arc<AppState>>,
    params: Result<Query<WebhookParams>, QueryRejection>,
    body: Result<Json<NewEvent>, JsonRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(e) => return bad_request(e.body_text()),
    };

    let candidate = match body {
        Ok(Json(candidate)) => candidate,
        Err(e) => return FlowWatchError::validation(e.body_text()).into_response(),
    };

    match state.ingest.ingest(params.token.as_deref(), candidate) {
        Ok(ingested) => Json(ingested).into_response(),
        Err(e) => e.into_response(),
    }
}
