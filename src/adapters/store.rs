//! Preference store adapters.
//!
//! Implements [`StoragePort`] twice:
//!
//! - [`MemoryStore`]: process-local map, used by tests and by `run` when no
//!   `--store-dir` is given.  Can be built in a failing mode to exercise the
//!   "write failed, keep in-memory value" path.
//! - [`FileStore`]: one file per key under `<root>/<namespace>/<key>`.
//!   Writes go to a sibling temp file and are renamed into place, so a reader
//!   sees either the old or the new blob.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::{debug, info, warn};

use crate::app::ports::{StoreError, StoragePort};

fn composite_key(namespace: &str, key: &str) -> String {
    format!("{}::{}", namespace, key)
}

fn copy_out(data: &[u8], buf: &mut [u8]) -> Result<usize, StoreError> {
    if data.len() > buf.len() {
        return Err(StoreError::BufferTooSmall);
    }
    buf[..data.len()].copy_from_slice(data);
    Ok(data.len())
}

// ───────────────────────────────────────────────────────────────
// MemoryStore
// ───────────────────────────────────────────────────────────────

/// In-memory key-value store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    store: RefCell<HashMap<String, Vec<u8>>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail with `IoError`.
    pub fn failing() -> Self {
        Self {
            store: RefCell::new(HashMap::new()),
            fail_writes: true,
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.store.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.borrow().is_empty()
    }
}

impl StoragePort for MemoryStore {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StoreError> {
        match self.store.borrow().get(&composite_key(namespace, key)) {
            Some(data) => copy_out(data, buf),
            None => Err(StoreError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::IoError);
        }
        self.store
            .borrow_mut()
            .insert(composite_key(namespace, key), data.to_vec());
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.store
            .borrow()
            .contains_key(&composite_key(namespace, key))
    }
}

// ───────────────────────────────────────────────────────────────
// FileStore
// ───────────────────────────────────────────────────────────────

/// Directory-backed store.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            warn!("FileStore: cannot create {}: {}", root.display(), e);
            StoreError::IoError
        })?;
        info!("FileStore: rooted at {}", root.display());
        Ok(Self { root })
    }

    fn path_for(&self, namespace: &str, key: &str) -> PathBuf {
        self.root.join(namespace).join(key)
    }
}

impl StoragePort for FileStore {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StoreError> {
        match fs::read(self.path_for(namespace, key)) {
            Ok(data) => copy_out(&data, buf),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound),
            Err(e) => {
                warn!("FileStore: read {}::{} failed: {}", namespace, key, e);
                Err(StoreError::IoError)
            }
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(namespace, key);
        let tmp = path.with_extension("tmp");
        let result = fs::create_dir_all(self.root.join(namespace))
            .and_then(|()| fs::write(&tmp, data))
            .and_then(|()| fs::rename(&tmp, &path));
        match result {
            Ok(()) => {
                debug!("FileStore: wrote {}::{} ({} bytes)", namespace, key, data.len());
                Ok(())
            }
            Err(e) => {
                warn!("FileStore: write {}::{} failed: {}", namespace, key, e);
                Err(StoreError::IoError)
            }
        }
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.path_for(namespace, key).is_file()
    }
}
