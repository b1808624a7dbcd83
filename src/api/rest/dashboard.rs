//! Human-facing dashboard endpoints
//!
//! These return the data the dashboard page renders; markup is left to the
//! front end.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{bad_request, ListParams};
use crate::api::state::AppState;
use crate::event_store::MAX_PER_PAGE;
use crate::types::Event;

/// Filter values echoed back so the page can refill its form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardFilters {
    pub workflow_name: String,
    pub resolved: String,
    pub q: String,
}

/// Everything the dashboard page shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub title: String,
    pub filters: DashboardFilters,
    pub page: u32,
    pub per_page: u32,
    pub total: usize,
    pub events: Vec<Event>,
}

/// GET / - Dashboard listing, full records, largest page by default
///
/// Pages hold at most 100 events. When `total` exceeds `per_page` the front
/// end pages with `?page=N`, keeping the same filters.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(e) => return bad_request(e.body_text()),
    };

    let listing = state
        .query
        .list_events(&params.filter(), params.page_or(MAX_PER_PAGE));

    let view = DashboardView {
        title: state.title.clone(),
        filters: DashboardFilters {
            workflow_name: params.workflow_name.clone().unwrap_or_default(),
            resolved: params.resolved.clone().unwrap_or_default(),
            q: params.q.clone().unwrap_or_default(),
        },
        page: listing.page.page(),
        per_page: listing.page.per_page(),
        total: listing.total,
        events: listing.events,
    };

    Json(view).into_response()
}

/// POST /resolve/:id - Resolve and send the browser back to the dashboard
pub async fn resolve_and_return(
    State(state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(e) => return bad_request(e.body_text()),
    };

    match state.query.resolve_event(id) {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => e.into_response(),
    }
}
