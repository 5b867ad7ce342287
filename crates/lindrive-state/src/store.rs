//! Thread-safe persistent path → remote-identity map
//!
//! ## Design Notes
//!
//! - The store is an owned handle: map and lock live inside the
//!   `StateStore` instance, and callers share it via `Arc`.
//! - Every mutation rewrites the whole file before returning
//!   (write-through), so once `set` returns the on-disk state is never
//!   behind what the caller observed in memory.
//! - The rewrite goes through a sibling temp file followed by an atomic
//!   rename: a crash mid-write leaves either the old file or the new
//!   one, never a truncated hybrid.
//! - A failed persist is logged and the in-memory mutation is kept; the
//!   caller is not failed. Durability here is best-effort by contract.
//! - A missing or malformed state file loads as an empty map. Losing the
//!   state can only cause redundant transfers, never data loss.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use lindrive_core::domain::newtypes::RelativePath;
use lindrive_core::domain::record::RemoteFileRecord;

/// Durable, thread-safe mapping of relative path → remote identity
///
/// Keys are root-relative, forward-slash-separated paths; values are the
/// remote item ID and content MD5 recorded at last sync. The on-disk
/// representation is a plain JSON object readable by any JSON tool.
pub struct StateStore {
    /// Backing file for the persisted mapping
    path: PathBuf,
    /// The in-memory mapping, guarded by the single store lock
    state: Mutex<HashMap<String, RemoteFileRecord>>,
}

impl StateStore {
    /// Opens a state store backed by the given file
    ///
    /// Loads the persisted mapping if the file exists and parses;
    /// otherwise starts empty. Never fails: an unreadable or corrupted
    /// state file degrades to an empty mapping with a warning.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = Self::load(&path);
        debug!(
            path = %path.display(),
            entries = state.len(),
            "State store opened"
        );
        Self {
            path,
            state: Mutex::new(state),
        }
    }

    /// Reads and parses the persisted mapping, degrading to empty
    fn load(path: &Path) -> HashMap<String, RemoteFileRecord> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read state file, starting empty");
                return HashMap::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "State file is malformed, starting empty");
                HashMap::new()
            }
        }
    }

    /// Returns the record for a path, if one is known
    pub fn get(&self, path: &RelativePath) -> Option<RemoteFileRecord> {
        self.lock().get(path.as_str()).cloned()
    }

    /// Inserts or overwrites the record for a path and persists
    ///
    /// The on-disk file is rewritten before this returns; a persist
    /// failure is logged and the in-memory mutation kept.
    pub fn set(&self, path: &RelativePath, record: RemoteFileRecord) {
        let mut state = self.lock();
        state.insert(path.as_str().to_string(), record);
        self.persist(&state);
    }

    /// Removes the record for a path and persists
    ///
    /// A no-op (no error, no rewrite) if the path is absent.
    pub fn remove(&self, path: &RelativePath) {
        let mut state = self.lock();
        if state.remove(path.as_str()).is_some() {
            self.persist(&state);
        }
    }

    /// Returns an independent copy of the full mapping
    ///
    /// Safe to iterate without holding the store lock.
    pub fn snapshot(&self) -> HashMap<String, RemoteFileRecord> {
        self.lock().clone()
    }

    /// Number of tracked paths
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no paths are tracked
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Acquires the store lock, recovering the map from a poisoned lock
    ///
    /// A panicked writer cannot leave the map half-mutated (every
    /// mutation is a single insert or remove), so the inner value is
    /// still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, RemoteFileRecord>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rewrites the persisted mapping while the lock is held
    ///
    /// Writes to a sibling temp file and renames it over the target so
    /// the on-disk file is replaced atomically. Failures are logged, not
    /// propagated.
    fn persist(&self, state: &HashMap<String, RemoteFileRecord>) {
        if let Err(e) = self.try_persist(state) {
            warn!(path = %self.path.display(), error = %e, "Failed to persist state");
        }
    }

    fn try_persist(&self, state: &HashMap<String, RemoteFileRecord>) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
