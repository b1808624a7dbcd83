//! Log entry types for the append-only event log
//!
//! The store persists one [`LogEntry`] per line. Replaying the entries in
//! order rebuilds the full set of events and their resolve state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::Event;

/// Kind of entry, carried in the `kind` field of every line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogEntryKind {
    Recorded,
    Resolved,
}

impl std::fmt::Display for LogEntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogEntryKind::Recorded => write!(f, "recorded"),
            LogEntryKind::Resolved => write!(f, "resolved"),
        }
    }
}

/// One line of `events.jsonl`
///
/// Lines are decoded through [`LogLine`] rather than serde's internally
/// tagged path, which buffers numbers and would lose the exact form of
/// payload numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", try_from = "LogLine")]
pub enum LogEntry {
    /// A new failure event, stored as received
    Recorded { event: Event },
    /// The Open → Resolved transition of an existing event
    Resolved {
        id: u64,
        resolved_at: DateTime<Utc>,
    },
}

/// Flat shape of a log line as it sits on disk
#[derive(Debug, Deserialize)]
struct LogLine {
    kind: LogEntryKind,
    #[serde(default)]
    event: Option<Event>,
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    resolved_at: Option<DateTime<Utc>>,
}

impl TryFrom<LogLine> for LogEntry {
    type Error = String;

    fn try_from(line: LogLine) -> Result<Self, Self::Error> {
        match line.kind {
            LogEntryKind::Recorded => line
                .event
                .map(|event| LogEntry::Recorded { event })
                .ok_or_else(|| "recorded entry without an event".to_string()),
            LogEntryKind::Resolved => match (line.id, line.resolved_at) {
                (Some(id), Some(resolved_at)) => Ok(LogEntry::Resolved { id, resolved_at }),
                _ => Err("resolved entry needs id and resolved_at".to_string()),
            },
        }
    }
}

impl LogEntry {
    pub fn kind(&self) -> LogEntryKind {
        match self {
            LogEntry::Recorded { .. } => LogEntryKind::Recorded,
            LogEntry::Resolved { .. } => LogEntryKind::Resolved,
        }
    }

    /// Id of the event this entry is about
    pub fn event_id(&self) -> u64 {
        match self {
            LogEntry::Recorded { event } => event.id,
            LogEntry::Resolved { id, .. } => *id,
        }
    }

    /// Serialize entry to JSON string (for JSONL)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize entry from JSON string
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_entry_serialization() {
        let at = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let entry = LogEntry::Resolved { id: 12, resolved_at: at };

        let json = entry.to_json_line().unwrap();
        assert!(json.contains("\"kind\":\"resolved\""));
        assert!(json.contains("\"id\":12"));

        let parsed = LogEntry::from_json_line(&json).unwrap();
        assert_eq!(parsed, entry);
        assert_eq!(parsed.kind(), LogEntryKind::Resolved);
        assert_eq!(parsed.event_id(), 12);
    }

    #[test]
    fn test_recorded_entry_keeps_payload_numbers() {
        let line = concat!(
            r#"{"kind":"recorded","event":{"id":3,"created_at":"2026-01-02T03:04:05Z","#,
            r#""workflow_id":null,"workflow_name":null,"node":null,"error_message":"boom","#,
            r#""error_stack":null,"run_id":null,"attempt":0,"#,
            r#""payload":{"zeta":1,"big":123456789012345678901234567890,"f":1.10},"#,
            r#""resolved":false,"resolved_at":null}}"#
        );

        let entry = LogEntry::from_json_line(line).unwrap();
        assert_eq!(entry.kind(), LogEntryKind::Recorded);
        assert_eq!(entry.event_id(), 3);
        assert!(entry.to_json_line().unwrap().contains(
            r#""payload":{"zeta":1,"big":123456789012345678901234567890,"f":1.10}"#
        ));
    }

    #[test]
    fn test_incomplete_entries_are_rejected() {
        assert!(LogEntry::from_json_line(r#"{"kind":"recorded"}"#).is_err());
        assert!(LogEntry::from_json_line(r#"{"kind":"resolved","id":4}"#).is_err());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result = LogEntry::from_json_line(r#"{"kind":"deleted","id":1}"#);
        assert!(result.is_err());
    }
}
