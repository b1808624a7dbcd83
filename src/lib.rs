//! FlowWatch
//!
//! Inbox for workflow failures reported by an automation platform
//! (n8n error workflows): an authenticated webhook stores each failure, a
//! dashboard and JSON API list them for triage, and a one-way resolve marks
//! them handled.
//!
//! # Modules
//!
//! - `types`: Event record, wire shapes and log entries
//! - `event_store`: Append-only durable store with transactions
//! - `validation`: Ingestion body checks
//! - `ingest`: Webhook token check and event creation
//! - `query`: Filtered listing and resolution
//! - `api`: Axum router and handlers
//! - `config`: Startup configuration
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use flowwatch::{AppState, Config, EventStore, EventStoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env();
//!     let store = Arc::new(EventStore::open(EventStoreConfig::new(&config.data_dir))?);
//!     let app = flowwatch::api::create_router(Arc::new(AppState::new(store, &config)));
//!     let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod event_store;
pub mod ingest;
pub mod query;
pub mod types;
pub mod validation;

// Re-export commonly used items at crate root
pub use api::AppState;
pub use config::Config;
pub use error::{FlowWatchError, FlowWatchResult};
pub use event_store::{EventFilter, EventStore, EventStoreConfig, Page};
pub use ingest::{IngestService, IngestToken, Ingested};
pub use query::{EventListing, EventPage, QueryService};
pub use types::{Event, EventSummary, NewEvent, Payload, Resolution};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
