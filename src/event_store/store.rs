//! Event Store - durable home of failure events
//!
//! Events live in an append-only `events.jsonl` log. At open the log is
//! replayed into an in-memory index; afterwards every committed
//! [`Transaction`] appends its entries (fsync'd) before touching the index.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::filter::{EventFilter, EventSlice, Page};
use super::transaction::Transaction;
use crate::types::{Event, LogEntry, Resolution, ValidEvent};

/// Configuration for the EventStore
#[derive(Debug, Clone, Default)]
pub struct EventStoreConfig {
    /// Directory holding `events.jsonl`; `None` keeps everything in memory
    pub data_dir: Option<PathBuf>,
}

impl EventStoreConfig {
    /// Create config with custom data directory
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: Some(data_dir.as_ref().to_path_buf()),
        }
    }

    /// Config for a store that never touches disk
    pub fn in_memory() -> Self {
        Self { data_dir: None }
    }

    /// Get path to events.jsonl
    pub fn events_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join("events.jsonl"))
    }
}

/// Result type for EventStore operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in EventStore operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("event {0} not found")]
    NotFound(u64),
    #[error("log corrupted: {0}")]
    Corrupted(String),
}

/// In-memory index rebuilt from the log
#[derive(Debug)]
pub(crate) struct StoreState {
    pub(crate) events: BTreeMap<u64, Event>,
    pub(crate) next_id: u64,
    /// Latest `created_at` seen, so new events never sort before old ones
    pub(crate) last_created_at: Option<DateTime<Utc>>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            events: BTreeMap::new(),
            next_id: 1,
            last_created_at: None,
        }
    }
}

impl StoreState {
    /// Keep `id` from ever being handed out again
    pub(crate) fn reserve_id(&mut self, id: u64) {
        if id >= self.next_id {
            self.next_id = id + 1;
        }
    }

    /// Apply a single log entry
    ///
    /// Duplicate records and resolutions of unknown or already-resolved
    /// events are ignored; the first resolution wins.
    pub(crate) fn apply(&mut self, entry: LogEntry) {
        match entry {
            LogEntry::Recorded { event } => {
                let id = event.id;
                if self.events.contains_key(&id) {
                    warn!(id, "duplicate recorded entry, keeping the first");
                    return;
                }
                if self.last_created_at.map_or(true, |last| event.created_at > last) {
                    self.last_created_at = Some(event.created_at);
                }
                self.events.insert(id, event);
                self.reserve_id(id);
            }
            LogEntry::Resolved { id, resolved_at } => match self.events.get_mut(&id) {
                Some(event) => {
                    if !event.mark_resolved(resolved_at) {
                        debug!(id, "resolution of already-resolved event ignored");
                    }
                }
                None => warn!(id, "resolution of unknown event ignored"),
            },
        }
    }
}

/// The EventStore: insert, point lookup, filtered scan, resolve
pub struct EventStore {
    config: EventStoreConfig,
    pub(crate) state: RwLock<StoreState>,
}

impl EventStore {
    /// Open the store, replaying any existing log
    pub fn open(config: EventStoreConfig) -> StoreResult<Self> {
        let state = match config.events_path() {
            Some(path) => Self::replay(&path)?,
            None => StoreState::default(),
        };

        info!(
            events = state.events.len(),
            next_id = state.next_id,
            path = ?config.events_path(),
            "event store opened"
        );

        Ok(Self {
            config,
            state: RwLock::new(state),
        })
    }

    /// Ephemeral store, nothing is written to disk
    pub fn in_memory() -> Self {
        Self {
            config: EventStoreConfig::in_memory(),
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Rebuild state from the log at `path`
    ///
    /// Blank lines are skipped; unparsable lines are skipped with a warning
    /// so one torn write does not take the whole store down.
    fn replay(path: &Path) -> StoreResult<StoreState> {
        let mut state = StoreState::default();

        if !path.exists() {
            return Ok(state);
        }

        Self::repair_tail(path)?;

        let reader = BufReader::new(File::open(path)?);
        let mut skipped = 0usize;

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }

            let entry = match LogEntry::from_json_line(&line) {
                Ok(entry) => entry,
                Err(e) => {
                    skipped += 1;
                    warn!(line = line_num + 1, error = %e, "skipping unreadable log line");
                    continue;
                }
            };

            match Self::check_entry(&entry) {
                Ok(()) => state.apply(entry),
                Err(e) => {
                    // The id is still taken even though the record is dropped
                    state.reserve_id(entry.event_id());
                    skipped += 1;
                    warn!(
                        line = line_num + 1,
                        kind = %entry.kind(),
                        id = entry.event_id(),
                        error = %e,
                        "skipping invalid log entry"
                    );
                }
            }
        }

        if skipped > 0 {
            warn!(skipped, "log replay skipped unreadable lines");
        }

        Ok(state)
    }

    /// Reject recorded events that break the event invariants
    fn check_entry(entry: &LogEntry) -> StoreResult<()> {
        if let LogEntry::Recorded { event } = entry {
            if event.error_message.is_empty() {
                return Err(StoreError::Corrupted(format!(
                    "event {} has an empty error_message",
                    event.id
                )));
            }
            if event.resolved != event.resolved_at.is_some() {
                return Err(StoreError::Corrupted(format!(
                    "event {} has inconsistent resolve state",
                    event.id
                )));
            }
        }
        Ok(())
    }

    /// Terminate a trailing partial line so later appends start cleanly
    fn repair_tail(path: &Path) -> StoreResult<()> {
        let mut file = OpenOptions::new().read(true).append(true).open(path)?;
        let len = file.metadata()?.len();
        if len == 0 {
            return Ok(());
        }

        file.seek(SeekFrom::Start(len - 1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        if last[0] != b'\n' {
            warn!("log ends with a partial line, terminating it");
            file.write_all(b"\n")?;
            file.sync_all()?;
        }
        Ok(())
    }

    /// Append entries to the log and fsync
    ///
    /// On failure the file is truncated back to its previous length so no
    /// partial entry survives.
    pub(crate) fn append_entries(&self, entries: &[LogEntry]) -> StoreResult<()> {
        let events_path = match self.config.events_path() {
            Some(path) => path,
            None => return Ok(()),
        };

        let mut buf = String::new();
        for entry in entries {
            buf.push_str(&entry.to_json_line()?);
            buf.push('\n');
        }

        // Ensure parent directory exists
        if let Some(parent) = events_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&events_path)?;
        let previous_len = file.metadata()?.len();

        let written = file
            .write_all(buf.as_bytes())
            .and_then(|_| file.sync_all());

        if let Err(e) = written {
            if let Err(truncate_err) = file.set_len(previous_len) {
                warn!(error = %truncate_err, "could not truncate log after failed append");
            }
            return Err(e.into());
        }

        Ok(())
    }

    /// Begin a transaction holding the store's write lock
    pub fn transaction(&self) -> Transaction<'_> {
        Transaction::begin(self)
    }

    /// Store a validated event, returning it with its assigned id and
    /// creation time
    pub fn insert(&self, event: ValidEvent) -> StoreResult<Event> {
        let mut txn = self.transaction();
        let stored = txn.insert(event);
        txn.commit()?;
        Ok(stored)
    }

    /// Point lookup
    pub fn get(&self, id: u64) -> Option<Event> {
        self.state.read().events.get(&id).cloned()
    }

    /// Filtered scan, most recent first, sliced to `page`
    ///
    /// `total` counts the whole filtered set.
    pub fn list(&self, filter: &EventFilter, page: Page) -> EventSlice {
        let state = self.state.read();

        let mut matching: Vec<&Event> = state
            .events
            .values()
            .filter(|e| filter.matches(e))
            .collect();

        let total = matching.len();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let items = matching
            .into_iter()
            .skip(page.offset())
            .take(page.per_page() as usize)
            .cloned()
            .collect();

        EventSlice { items, total }
    }

    /// Mark an event resolved if it is still open
    ///
    /// Idempotent: an already-resolved event is returned unchanged with
    /// `changed == false`.
    pub fn update_resolved(&self, id: u64) -> StoreResult<Resolution> {
        let mut txn = self.transaction();
        let resolution = txn.resolve(id)?;
        txn.commit()?;
        Ok(resolution)
    }

    /// Number of stored events
    pub fn len(&self) -> usize {
        self.state.read().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
