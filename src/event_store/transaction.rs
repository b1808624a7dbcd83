//! Store transactions
//!
//! A [`Transaction`] holds the store's write lock for its whole lifetime.
//! Inserts and resolutions are staged; [`Transaction::commit`] writes them
//! to the log in one append and only then applies them to the in-memory
//! index. Dropping a transaction without committing discards everything it
//! staged, so an error on any path leaves the store as it was.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLockWriteGuard;
use tracing::debug;

use super::store::{EventStore, StoreError, StoreResult, StoreState};
use crate::types::{Event, LogEntry, Resolution, ValidEvent};

pub struct Transaction<'a> {
    store: &'a EventStore,
    state: RwLockWriteGuard<'a, StoreState>,
    /// Entries to append on commit, in order
    staged: Vec<LogEntry>,
    /// Events created or changed by this transaction
    pending: BTreeMap<u64, Event>,
    next_id: u64,
    last_created_at: Option<DateTime<Utc>>,
    committed: bool,
}

impl<'a> Transaction<'a> {
    pub(crate) fn begin(store: &'a EventStore) -> Self {
        let state = store.state.write();
        let next_id = state.next_id;
        let last_created_at = state.last_created_at;
        Self {
            store,
            state,
            staged: Vec::new(),
            pending: BTreeMap::new(),
            next_id,
            last_created_at,
            committed: false,
        }
    }

    /// Creation time for a new event; never earlier than the previous one so
    /// id order and `created_at` order agree
    fn creation_time(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let at = match self.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_created_at = Some(at);
        at
    }

    /// Stage a new event; the returned record carries its assigned id
    pub fn insert(&mut self, event: ValidEvent) -> Event {
        let id = self.next_id;
        self.next_id += 1;

        let created_at = self.creation_time();
        let event = event.into_event(id, created_at);

        self.staged.push(LogEntry::Recorded {
            event: event.clone(),
        });
        self.pending.insert(id, event.clone());
        event
    }

    /// Read an event as this transaction sees it
    pub fn get(&self, id: u64) -> Option<&Event> {
        self.pending.get(&id).or_else(|| self.state.events.get(&id))
    }

    /// Stage the Open → Resolved transition
    ///
    /// The check and the write happen under the same lock, so concurrent
    /// resolutions of one event perform the transition at most once.
    pub fn resolve(&mut self, id: u64) -> StoreResult<Resolution> {
        let mut event = self.get(id).cloned().ok_or(StoreError::NotFound(id))?;

        let resolved_at = Utc::now();
        let changed = event.mark_resolved(resolved_at);
        let resolution = Resolution {
            id,
            resolved: event.resolved,
            resolved_at: event.resolved_at,
            changed,
        };

        if changed {
            self.staged.push(LogEntry::Resolved { id, resolved_at });
            self.pending.insert(id, event);
        }

        Ok(resolution)
    }

    /// Number of staged entries
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Persist staged entries, then apply them
    pub fn commit(mut self) -> StoreResult<()> {
        if !self.staged.is_empty() {
            self.store.append_entries(&self.staged)?;
        }

        for entry in std::mem::take(&mut self.staged) {
            debug!(id = entry.event_id(), kind = %entry.kind(), "log entry committed");
            self.state.apply(entry);
        }
        self.pending.clear();
        self.committed = true;
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.committed && !self.staged.is_empty() {
            debug!(entries = self.staged.len(), "transaction rolled back");
        }
    }
}
