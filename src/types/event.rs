//! Failure event types
//!
//! An [`Event`] is one workflow failure report as it lives in the store.
//! [`NewEvent`] is the candidate sent by the automation platform before the
//! store assigns an id and creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque structured value attached to a failure report.
///
/// The store never looks inside; whatever JSON arrives is written and read
/// back verbatim. Object keys keep their order and numbers keep their exact
/// text (`preserve_order` and `arbitrary_precision` on serde_json).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(serde_json::Value);

impl Payload {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

/// Candidate failure report as received on the webhook
///
/// Every field is optional at the wire level so that a missing
/// `error_message` surfaces as a validation failure rather than a decode
/// failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    #[serde(default)]
    pub workflow_id: Option<String>,
    #[serde(default)]
    pub workflow_name: Option<String>,
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error_stack: Option<String>,
    #[serde(default)]
    pub run_id: Option<String>,
    /// Retry count at time of failure; `null` and absent both mean 0
    #[serde(default)]
    pub attempt: Option<i64>,
    /// Explicit `null` decodes to `None`
    #[serde(default)]
    pub payload: Option<Payload>,
}

impl NewEvent {
    /// Convenience constructor used by tests and tooling
    pub fn with_message(error_message: impl Into<String>) -> Self {
        Self {
            error_message: Some(error_message.into()),
            ..Default::default()
        }
    }

    pub fn workflow(mut self, workflow_id: impl Into<String>, workflow_name: impl Into<String>) -> Self {
        self.workflow_id = Some(workflow_id.into());
        self.workflow_name = Some(workflow_name.into());
        self
    }

    pub fn node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }

    pub fn stack(mut self, error_stack: impl Into<String>) -> Self {
        self.error_stack = Some(error_stack.into());
        self
    }

    pub fn run(mut self, run_id: impl Into<String>, attempt: i64) -> Self {
        self.run_id = Some(run_id.into());
        self.attempt = Some(attempt);
        self
    }

    pub fn payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(Payload(payload));
        self
    }
}

/// A validated failure report, ready to be handed to the store
///
/// Only [`crate::validation::validate_new_event`] builds one, so holding a
/// `ValidEvent` means `error_message` is non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidEvent {
    pub(crate) workflow_id: Option<String>,
    pub(crate) workflow_name: Option<String>,
    pub(crate) node: Option<String>,
    pub(crate) error_message: String,
    pub(crate) error_stack: Option<String>,
    pub(crate) run_id: Option<String>,
    pub(crate) attempt: i64,
    pub(crate) payload: Option<Payload>,
}

impl ValidEvent {
    /// Attach the store-assigned identity
    pub(crate) fn into_event(self, id: u64, created_at: DateTime<Utc>) -> Event {
        Event {
            id,
            created_at,
            workflow_id: self.workflow_id,
            workflow_name: self.workflow_name,
            node: self.node,
            error_message: self.error_message,
            error_stack: self.error_stack,
            run_id: self.run_id,
            attempt: self.attempt,
            payload: self.payload,
            resolved: false,
            resolved_at: None,
        }
    }
}

/// One stored workflow failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Store-assigned, strictly increasing id
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub workflow_id: Option<String>,
    pub workflow_name: Option<String>,
    pub node: Option<String>,
    pub error_message: String,
    pub error_stack: Option<String>,
    pub run_id: Option<String>,
    pub attempt: i64,
    pub payload: Option<Payload>,
    pub resolved: bool,
    /// Set exactly once, together with `resolved`
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Event {
    pub fn is_open(&self) -> bool {
        !self.resolved
    }

    /// Open → Resolved. Returns false, leaving the record untouched, when the
    /// event was already resolved.
    pub(crate) fn mark_resolved(&mut self, at: DateTime<Utc>) -> bool {
        if self.resolved {
            return false;
        }
        self.resolved = true;
        self.resolved_at = Some(at);
        true
    }

    pub fn summary(&self) -> EventSummary {
        EventSummary::from(self)
    }
}

/// List API projection of an [`Event`]
///
/// `error_stack`, `payload` and `resolved_at` are left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub workflow_id: Option<String>,
    pub workflow_name: Option<String>,
    pub node: Option<String>,
    pub error_message: String,
    pub run_id: Option<String>,
    pub attempt: i64,
    pub resolved: bool,
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            created_at: Some(event.created_at),
            workflow_id: event.workflow_id.clone(),
            workflow_name: event.workflow_name.clone(),
            node: event.node.clone(),
            error_message: event.error_message.clone(),
            run_id: event.run_id.clone(),
            attempt: event.attempt,
            resolved: event.resolved,
        }
    }
}

/// Outcome of a resolve request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub id: u64,
    pub resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    /// Whether this call performed the Open → Resolved transition
    pub changed: bool,
}
