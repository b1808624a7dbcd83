//! Data types for FlowWatch
//!
//! This module contains the event record, its wire shapes and the on-disk
//! log entry format.

mod event;
mod log;

pub use event::{Event, EventSummary, NewEvent, Payload, Resolution, ValidEvent};
pub use log::{LogEntry, LogEntryKind};
