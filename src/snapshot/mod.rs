//! Last-seen fingerprints per source.
//!
//! The file backend keeps the whole map in memory and rewrites it on every
//! change through a temp file in the same directory followed by a rename, so
//! a failed write never leaves a half-written snapshot behind.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::Result;

pub trait SnapshotStore {
    fn get(&self, key: &str) -> Option<&str>;

    /// Store `fingerprint` under `key` and make it durable. On error the
    /// previous value is still in place.
    fn record(&mut self, key: &str, fingerprint: &str) -> Result<()>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// JSON object file (`{"source": "fingerprint", ...}`)
#[derive(Debug)]
pub struct FileSnapshotStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileSnapshotStore {
    /// Load the snapshot at `path`. A missing file starts empty; an unreadable
    /// or malformed file is logged and also starts empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Snapshot file is malformed, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No snapshot file yet");
                BTreeMap::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Snapshot file unreadable, starting empty");
                BTreeMap::new()
            }
        };

        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, &self.entries)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn record(&mut self, key: &str, fingerprint: &str) -> Result<()> {
        let previous = self.entries.insert(key.to_string(), fingerprint.to_string());

        if let Err(e) = self.persist() {
            match previous {
                Some(value) => self.entries.insert(key.to_string(), value),
                None => self.entries.remove(key),
            };
            return Err(e);
        }

        debug!(key = %key, path = %self.path.display(), "Snapshot updated");
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// In-process store for tests and dry runs
#[derive(Debug, Default, Clone)]
pub struct MemorySnapshotStore {
    entries: BTreeMap<String, String>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn record(&mut self, key: &str, fingerprint: &str) -> Result<()> {
        self.entries.insert(key.to_string(), fingerprint.to_string());
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
