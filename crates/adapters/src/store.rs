// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable string key-value storage.
//!
//! [`FileStore`] keeps a flat JSON object on disk and rewrites it through a
//! synced temp file and rename, so a crash mid-write leaves the previous
//! contents.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors from the key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt store file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Adapter for durable key-value storage
pub trait KeyValueStore: Clone + Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Key-value store backed by a single JSON file.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Arc::new(Mutex::new(())) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw)
            .map_err(|source| StoreError::Corrupt { path: self.path.clone(), source })
    }

    fn save(&self, map: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if map.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        let mut file = fs::File::create(&tmp)?;
        file.write_all(&serde_json::to_vec_pretty(map)?)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, &self.path)?;
        sync_parent_dir(&self.path)
    }
}

/// Persist the rename itself.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::File::open(parent)?.sync_all()?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut map = self.load()?;
        map.insert(key.to_string(), value.to_string());
        self.save(&map)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        // A corrupt file is replaced rather than blocking the delete
        let mut map = match self.load() {
            Ok(map) => map,
            Err(StoreError::Corrupt { path, source }) => {
                tracing::warn!(path = %path.display(), error = %source, "discarding corrupt store file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        if map.remove(key).is_none() && !map.is_empty() {
            return Ok(());
        }
        self.save(&map)
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{KeyValueStore, StoreError};
    use parking_lot::Mutex;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    /// Recorded store operation
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum StoreOp {
        Get(String),
        Set(String, String),
        Delete(String),
    }

    #[derive(Default)]
    struct MemoryState {
        values: BTreeMap<String, String>,
        ops: Vec<StoreOp>,
        fail_reads: bool,
    }

    /// In-memory store that records every operation
    #[derive(Clone, Default)]
    pub struct MemoryStore {
        inner: Arc<Mutex<MemoryState>>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn ops(&self) -> Vec<StoreOp> {
            self.inner.lock().ops.clone()
        }

        pub fn snapshot(&self) -> BTreeMap<String, String> {
            self.inner.lock().values.clone()
        }

        /// Make every subsequent `get` fail with an IO error.
        pub fn fail_reads(&self) {
            self.inner.lock().fail_reads = true;
        }
    }

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            let mut inner = self.inner.lock();
            inner.ops.push(StoreOp::Get(key.to_string()));
            if inner.fail_reads {
                return Err(StoreError::Io(std::io::Error::other("injected read failure")));
            }
            Ok(inner.values.get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            let mut inner = self.inner.lock();
            inner.ops.push(StoreOp::Set(key.to_string(), value.to_string()));
            inner.values.insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn delete(&self, key: &str) -> Result<(), StoreError> {
            let mut inner = self.inner.lock();
            inner.ops.push(StoreOp::Delete(key.to_string()));
            inner.values.remove(key);
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{MemoryStore, StoreOp};

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
