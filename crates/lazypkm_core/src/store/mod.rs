//! Durable storage for record collections.
//!
//! # Responsibility
//! - Define the container-per-kind load/save contract.
//! - Decode containers tolerantly: corruption degrades to an empty sequence,
//!   bad records are skipped, and neither aborts a load.
//!
//! # Invariants
//! - `save` overwrites the whole container; there are no partial writes.
//! - `save` followed by `load` yields field-for-field equal records in the
//!   same order.
//! - Single-writer discipline is the caller's responsibility.

pub mod json_store;
pub mod memory_store;

use crate::model::assignment::Assignment;
use crate::model::knowledge::KnowledgeEntry;
use crate::model::schedule::ScheduleSlot;
use crate::model::task::Task;
use crate::model::EntityKind;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub use json_store::JsonFileStore;
pub use memory_store::MemoryStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage failures that reach the caller.
///
/// Corrupt containers are not represented here: they are logged and read as
/// empty.
#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Serialize {
        kind: EntityKind,
        source: serde_json::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "storage I/O failed at `{}`: {source}", path.display())
            }
            Self::Serialize { kind, source } => write!(f, "failed to serialize {kind}: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize { source, .. } => Some(source),
        }
    }
}

/// A record type with its own storage container.
pub trait StoredRecord: Serialize + DeserializeOwned {
    const KIND: EntityKind;
}

impl StoredRecord for KnowledgeEntry {
    const KIND: EntityKind = EntityKind::Knowledge;
}

impl StoredRecord for Task {
    const KIND: EntityKind = EntityKind::Task;
}

impl StoredRecord for ScheduleSlot {
    const KIND: EntityKind = EntityKind::Schedule;
}

impl StoredRecord for Assignment {
    const KIND: EntityKind = EntityKind::Assignment;
}

/// Raw container access plus the typed load/save contract built on it.
pub trait RecordStore {
    /// Reads the raw container text, or `None` when it does not exist.
    fn read_container(&self, kind: EntityKind) -> StoreResult<Option<String>>;

    /// Replaces the raw container text.
    fn write_container(&self, kind: EntityKind, contents: &str) -> StoreResult<()>;

    /// Loads every decodable record of one kind, in stored order.
    ///
    /// Returns an empty sequence when the container is missing or corrupt.
    fn load<T: StoredRecord>(&self) -> StoreResult<Vec<T>> {
        let Some(contents) = self.read_container(T::KIND)? else {
            info!(
                "event=store_load module=store status=ok kind={} records=0 container=missing",
                T::KIND
            );
            return Ok(Vec::new());
        };
        Ok(decode_container(T::KIND, &contents))
    }

    /// Overwrites the container of one kind with `records`.
    fn save<T: StoredRecord>(&self, records: &[T]) -> StoreResult<()> {
        let contents = encode_container(T::KIND, records)?;
        self.write_container(T::KIND, &contents)?;
        info!(
            "event=store_save module=store status=ok kind={} records={}",
            T::KIND,
            records.len()
        );
        Ok(())
    }
}

/// Encodes records as a pretty-printed JSON array.
pub fn encode_container<T: Serialize>(kind: EntityKind, records: &[T]) -> StoreResult<String> {
    serde_json::to_string_pretty(records).map_err(|source| StoreError::Serialize { kind, source })
}

/// Decodes a JSON array container record-by-record.
///
/// Non-array or malformed input yields an empty sequence; records that fail
/// to decode are skipped. Both cases are logged at warn level.
pub fn decode_container<T: DeserializeOwned>(kind: EntityKind, contents: &str) -> Vec<T> {
    if contents.trim().is_empty() {
        warn!("event=store_corrupt module=store status=warn kind={kind} reason=empty_container");
        return Vec::new();
    }

    let values = match serde_json::from_str::<serde_json::Value>(contents) {
        Ok(serde_json::Value::Array(values)) => values,
        Ok(_) => {
            warn!("event=store_corrupt module=store status=warn kind={kind} reason=not_an_array");
            return Vec::new();
        }
        Err(err) => {
            warn!("event=store_corrupt module=store status=warn kind={kind} error={err}");
            return Vec::new();
        }
    };

    let total = values.len();
    let mut records = Vec::with_capacity(total);
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<T>(value) {
            Ok(record) => records.push(record),
            Err(err) => warn!(
                "event=store_record_skipped module=store status=warn kind={kind} index={index} error={err}"
            ),
        }
    }

    info!(
        "event=store_load module=store status=ok kind={kind} records={} skipped={}",
        records.len(),
        total - records.len()
    );
    records
}

#[cfg(test)]
mod tests {
    use super::decode_container;
    use crate::model::task::Task;
    use crate::model::EntityKind;

    #[test]
    fn decode_container_treats_object_as_corrupt() {
        let tasks: Vec<Task> = decode_container(EntityKind::Task, r#"{"title": "x"}"#);
        assert!(tasks.is_empty());
    }

    #[test]
    fn decode_container_skips_only_bad_records() {
        let contents = r#"[
            {"title": "ok", "description": "d", "due_date": "2025-01-01"},
            {"title": "missing description", "due_date": "2025-01-01"},
            {"title": "", "description": "blank title", "due_date": null}
        ]"#;
        let tasks: Vec<Task> = decode_container(EntityKind::Task, contents);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title(), "ok");
    }
}
