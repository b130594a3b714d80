//! In-memory settings store for tests
//!
//! Holds documents in a mutex-guarded map, records writes per resource, and
//! supports one-shot failure injection on GET and PUT so error paths can be
//! exercised deterministically.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::store::{SettingsStore, StoreError};

/// Per-resource write bookkeeping.
#[derive(Debug, Clone)]
pub struct WriteRecord {
    pub count: u64,
    pub last_written_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MockStoreState {
    documents: HashMap<String, Value>,
    fail_get: HashMap<String, String>,
    fail_put: HashMap<String, String>,
    writes: HashMap<String, WriteRecord>,
}

/// Configurable in-memory store.
#[derive(Debug, Default)]
pub struct MockStore {
    state: Mutex<MockStoreState>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a persisted document.
    pub fn with_document(self, resource: &str, document: Value) -> Self {
        self.seed(resource, document);
        self
    }

    /// Seed a persisted document on an existing store.
    pub fn seed(&self, resource: &str, document: Value) {
        let mut state = self.state.lock().unwrap();
        state.documents.insert(resource.to_string(), document);
    }

    /// Make the next GET of `resource` fail as unreachable.
    pub fn fail_next_get(&self, resource: &str, message: &str) {
        let mut state = self.state.lock().unwrap();
        state.fail_get.insert(resource.to_string(), message.to_string());
    }

    /// Make the next PUT of `resource` fail as unreachable.
    pub fn fail_next_put(&self, resource: &str, message: &str) {
        let mut state = self.state.lock().unwrap();
        state.fail_put.insert(resource.to_string(), message.to_string());
    }

    /// Current persisted document, if any.
    pub fn document(&self, resource: &str) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state.documents.get(resource).cloned()
    }

    /// Number of successful PUTs for a resource.
    pub fn write_count(&self, resource: &str) -> u64 {
        let state = self.state.lock().unwrap();
        state.writes.get(resource).map(|r| r.count).unwrap_or(0)
    }

    /// Timestamp of the last successful PUT for a resource.
    pub fn last_written_at(&self, resource: &str) -> Option<DateTime<Utc>> {
        let state = self.state.lock().unwrap();
        state.writes.get(resource).map(|r| r.last_written_at)
    }
}

impl SettingsStore for MockStore {
    fn get(&self, resource: &str) -> Result<Option<Value>, StoreError> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.fail_get.remove(resource) {
            return Err(StoreError::Unreachable(message));
        }
        Ok(state.documents.get(resource).cloned())
    }

    fn put(&self, resource: &str, document: &Value) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.fail_put.remove(resource) {
            return Err(StoreError::Unreachable(message));
        }
        state
            .documents
            .insert(resource.to_string(), document.clone());
        let record = state
            .writes
            .entry(resource.to_string())
            .or_insert(WriteRecord {
                count: 0,
                last_written_at: Utc::now(),
            });
        record.count += 1;
        record.last_written_at = Utc::now();
        Ok(())
    }
}
