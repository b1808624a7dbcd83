//! REST API module for HTTP endpoints
//!
//! - `POST /webhooks/n8n` - Ingest a failure report
//! - `GET /api/events` - List events with filters and pagination
//! - `GET /api/events/:id` - Get single event
//! - `POST /api/events/:id/resolve` - Resolve an event
//! - `GET /` - Dashboard listing
//! - `POST /resolve/:id` - Resolve from the dashboard, redirect back

pub mod dashboard;
pub mod events;
pub mod webhooks;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::FlowWatchError;
use crate::event_store::{EventFilter, Page, DEFAULT_PER_PAGE};

/// Query parameters shared by the dashboard and the list API
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// 1-based page number (default: 1)
    pub page: Option<i64>,
    /// Page size (clamped to 1..=100)
    pub per_page: Option<i64>,
    /// `true` / `false`; anything else means no filter
    pub resolved: Option<String>,
    /// Substring of the workflow name
    pub workflow_name: Option<String>,
    /// Free text, matched against error message and stack
    pub q: Option<String>,
}

impl ListParams {
    pub fn filter(&self) -> EventFilter {
        EventFilter::new()
            .workflow_name(self.workflow_name.as_deref())
            .resolved(EventFilter::parse_resolved(self.resolved.as_deref()))
            .text(self.q.as_deref())
    }

    pub fn page(&self) -> Page {
        self.page_or(DEFAULT_PER_PAGE)
    }

    pub fn page_or(&self, default_per_page: u32) -> Page {
        Page::new(
            self.page.unwrap_or(1),
            self.per_page.unwrap_or(default_per_page as i64),
        )
    }
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "BAD_REQUEST".to_string(),
        }
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// 400 for query strings and paths that do not decode
pub(crate) fn bad_request(message: impl Into<String>) -> Response {
    ApiError::bad_request(message).into_response_with(StatusCode::BAD_REQUEST)
}

impl IntoResponse for FlowWatchError {
    fn into_response(self) -> Response {
        let status = match &self {
            FlowWatchError::Unauthorized => StatusCode::UNAUTHORIZED,
            FlowWatchError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            FlowWatchError::NotFound(_) => StatusCode::NOT_FOUND,
            FlowWatchError::Store(e) => {
                error!(error = %e, "store failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Store details stay in the log
        let message = match &self {
            FlowWatchError::Store(_) => "internal error".to_string(),
            other => other.to_string(),
        };

        ApiError {
            error: message,
            code: self.code().to_string(),
        }
        .into_response_with(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_defaults() {
        let params = ListParams::default();
        assert_eq!(params.page(), Page::new(1, 20));
        assert!(params.filter().is_empty());
    }

    #[test]
    fn test_list_params_build_filter() {
        let params = ListParams {
            resolved: Some("true".to_string()),
            workflow_name: Some("Sync".to_string()),
            ..Default::default()
        };
        assert_eq!(
            params.filter(),
            EventFilter::new().workflow_name(Some("sync")).resolved(Some(true))
        );
    }

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (FlowWatchError::Unauthorized, StatusCode::UNAUTHORIZED),
            (FlowWatchError::validation("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (FlowWatchError::NotFound(1), StatusCode::NOT_FOUND),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
