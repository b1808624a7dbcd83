//! Event endpoints

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::{IntoResponse, Response},
    Json,
};

use super::{bad_request, ListParams};
use crate::api::state::AppState;

/// GET /api/events - List events with filters and pagination
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(e) => return bad_request(e.body_text()),
    };

    let listing = state.query.list_events(&params.filter(), params.page());
    Json(listing.into_api_page()).into_response()
}

/// GET /api/events/:id - Get single event with every stored field
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(e) => return bad_request(e.body_text()),
    };

    match state.query.get_event(id) {
        Ok(event) => Json(event).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /api/events/:id/resolve - Resolve an event
pub async fn resolve_event(
    State(state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(e) => return bad_request(e.body_text()),
    };

    match state.query.resolve_event(id) {
        Ok(resolution) => Json(resolution).into_response(),
        Err(e) => e.into_response(),
    }
}
