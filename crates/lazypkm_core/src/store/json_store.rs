//! Directory-backed JSON container store.
//!
//! # Responsibility
//! - Map each entity kind to `<data_dir>/<kind>.json`.
//! - Replace containers by writing a sibling temp file and renaming it over
//!   the target.
//!
//! # Invariants
//! - A missing container file reads as `None`, never as an error.
//! - The data directory is created on first write.

use crate::model::EntityKind;
use crate::store::{RecordStore, StoreError, StoreResult};
use log::{error, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File-system store rooted at one data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Container path for one entity kind.
    pub fn container_path(&self, kind: EntityKind) -> PathBuf {
        self.data_dir.join(format!("{}.json", kind.as_str()))
    }
}

impl RecordStore for JsonFileStore {
    fn read_container(&self, kind: EntityKind) -> StoreResult<Option<String>> {
        let path = self.container_path(kind);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            // Non-UTF-8 bytes are corrupt content, not an I/O fault.
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                warn!(
                    "event=store_corrupt module=store status=warn kind={kind} path={} error={err}",
                    path.display()
                );
                Ok(Some(String::new()))
            }
            Err(source) => {
                error!(
                    "event=store_load module=store status=error kind={kind} path={} error={source}",
                    path.display()
                );
                Err(StoreError::Io { path, source })
            }
        }
    }

    fn write_container(&self, kind: EntityKind, contents: &str) -> StoreResult<()> {
        fs::create_dir_all(&self.data_dir).map_err(|source| StoreError::Io {
            path: self.data_dir.clone(),
            source,
        })?;

        let target = self.container_path(kind);
        let staging = self.data_dir.join(format!(".{}.json.tmp", kind.as_str()));
        let result = fs::write(&staging, contents)
            .and_then(|()| fs::rename(&staging, &target))
            .map_err(|source| StoreError::Io {
                path: target.clone(),
                source,
            });

        if let Err(err) = &result {
            let _ = fs::remove_file(&staging);
            error!("event=store_save module=store status=error kind={kind} error={err}");
        }
        result
    }
}
