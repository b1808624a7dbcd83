//! Validation of inbound failure reports

mod event;

pub use event::validate_new_event;
