//! Event Store Module
//!
//! Durable persistence of failure events:
//! - `EventStore`: insert, point lookup, filtered/sorted/paginated scan,
//!   conditional resolve
//! - `Transaction`: exclusive handle that commits all staged entries in one
//!   fsync'd append, or rolls back on drop
//! - `EventFilter` / `Page`: listing filters and clamped pagination
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//! ┌──────────┐    ┌──────────────┐    ┌─────────────────┐    ┌──────────────┐
//! │ webhook/ │───►│ transaction()│───►│ append + fsync  │───►│ apply to     │
//! │ resolve  │    │ (write lock) │    │ events.jsonl    │    │ memory index │
//! └──────────┘    └──────────────┘    └─────────────────┘    └──────────────┘
//!
//! Read Path (Startup):
//! ┌─────────────────┐    ┌──────────────────┐
//! │ Replay log lines│───►│ Index by id      │───► Ready!
//! │ (skip corrupt)  │    │ next_id = max+1  │
//! └─────────────────┘    └──────────────────┘
//! ```

mod filter;
mod store;
mod transaction;

pub use filter::{EventFilter, EventSlice, Page, DEFAULT_PER_PAGE, MAX_PER_PAGE};
pub use store::{EventStore, EventStoreConfig, StoreError, StoreResult};
pub use transaction::Transaction;
