//! Listing and resolution of stored events
//!
//! The dashboard and the JSON API both go through [`QueryService`], so the
//! two surfaces always agree on filter semantics.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{FlowWatchError, FlowWatchResult};
use crate::event_store::{EventFilter, EventStore, Page};
use crate::types::{Event, EventSummary, Resolution};

/// One page of full event records
#[derive(Debug, Clone, PartialEq)]
pub struct EventListing {
    pub page: Page,
    /// Size of the whole filtered set
    pub total: usize,
    pub events: Vec<Event>,
}

impl EventListing {
    /// Machine-facing projection
    pub fn into_api_page(self) -> EventPage {
        let items: Vec<EventSummary> = self.events.iter().map(EventSummary::from).collect();
        EventPage {
            page: self.page.page(),
            per_page: self.page.per_page(),
            count: items.len(),
            total: self.total,
            items,
        }
    }
}

/// Response body of `GET /api/events`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPage {
    pub page: u32,
    pub per_page: u32,
    /// Items on this page
    pub count: usize,
    /// Items matching the filters across all pages
    pub total: usize,
    pub items: Vec<EventSummary>,
}

pub struct QueryService {
    store: Arc<EventStore>,
}

impl QueryService {
    pub fn new(store: Arc<EventStore>) -> Self {
        Self { store }
    }

    pub fn list_events(&self, filter: &EventFilter, page: Page) -> EventListing {
        let slice = self.store.list(filter, page);
        EventListing {
            page,
            total: slice.total,
            events: slice.items,
        }
    }

    pub fn get_event(&self, id: u64) -> FlowWatchResult<Event> {
        self.store.get(id).ok_or(FlowWatchError::NotFound(id))
    }

    /// Open → Resolved; succeeds without change if already resolved
    pub fn resolve_event(&self, id: u64) -> FlowWatchResult<Resolution> {
        let resolution = self.store.update_resolved(id)?;
        if resolution.changed {
            info!(id, "event resolved");
        }
        Ok(resolution)
    }
}
