//! Persisted per-file state record
//!
//! The value type of the state mapping. The serialized field names (`id`,
//! `md5`) are the on-disk state file format and must stay stable.

use serde::{Deserialize, Serialize};

/// Last known synchronized identity of one local file
///
/// Maps a local relative path to the remote object it was last synchronized
/// with: the remote item ID and the MD5 checksum of the content at that
/// point. The pairing is the sole durable source of truth for "what we
/// believe the remote side holds for this path".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFileRecord {
    /// Remote item ID assigned by the storage provider
    pub id: String,
    /// MD5 checksum (lowercase hex) of the content at last sync
    pub md5: String,
}

impl RemoteFileRecord {
    /// Create a new record
    pub fn new(id: impl Into<String>, md5: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            md5: md5.into(),
        }
    }
}
