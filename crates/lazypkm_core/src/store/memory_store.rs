//! In-process store for tests and throwaway sessions.

use crate::model::EntityKind;
use crate::store::{RecordStore, StoreResult};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Keeps raw container text in memory.
///
/// Decoding goes through the same tolerant path as [`super::JsonFileStore`],
/// so corrupt fixtures behave identically.
#[derive(Debug, Default)]
pub struct MemoryStore {
    containers: RefCell<BTreeMap<EntityKind, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds or replaces one raw container.
    pub fn put_raw(&self, kind: EntityKind, contents: impl Into<String>) {
        self.containers.borrow_mut().insert(kind, contents.into());
    }

    /// Returns the raw container text, if any.
    pub fn raw(&self, kind: EntityKind) -> Option<String> {
        self.containers.borrow().get(&kind).cloned()
    }
}

impl RecordStore for MemoryStore {
    fn read_container(&self, kind: EntityKind) -> StoreResult<Option<String>> {
        Ok(self.raw(kind))
    }

    fn write_container(&self, kind: EntityKind, contents: &str) -> StoreResult<()> {
        self.put_raw(kind, contents);
        Ok(())
    }
}
