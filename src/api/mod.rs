//! API module for HTTP endpoints
//!
//! This module provides the ingestion webhook, the dashboard data endpoints
//! and the JSON query API.

pub mod http;
pub mod rest;
pub mod state;

pub use http::create_router;
pub use state::AppState;
