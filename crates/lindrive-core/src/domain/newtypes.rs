//! Domain newtypes with validation
//!
//! Strongly-typed wrappers for remote identifiers, root-relative paths,
//! and content hashes. Each newtype ensures data validity at construction
//! time so the rest of the system never handles raw, unchecked strings.

use std::fmt::{self, Display, Formatter};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// RemoteId
// ============================================================================

/// Provider-assigned identifier of a remote file or folder
///
/// Google Drive item IDs are opaque, non-empty, URL-safe strings. The only
/// validation performed here is non-emptiness and the absence of path
/// separators (an ID is never a path).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteId(String);

impl RemoteId {
    /// Create a validated RemoteId
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidRemoteId`] if the value is empty or
    /// contains a `/`.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::InvalidRemoteId(
                "remote ID must not be empty".to_string(),
            ));
        }
        if value.contains('/') {
            return Err(DomainError::InvalidRemoteId(value));
        }
        Ok(Self(value))
    }

    /// Get the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RemoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RemoteId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ============================================================================
// RelativePath
// ============================================================================

/// A root-relative, forward-slash separated path inside the sync root
///
/// This is the key type of the state mapping. Invariants enforced at
/// construction:
/// - non-empty
/// - no leading `/` (root-relative, not absolute)
/// - no backslashes (forward-slash separators only)
/// - no `.` or `..` components (cannot escape the sync root)
/// - no empty components (no `//`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelativePath(String);

impl RelativePath {
    /// Create a validated RelativePath
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidPath`] if any invariant is violated.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::InvalidPath(
                "relative path must not be empty".to_string(),
            ));
        }
        if value.starts_with('/') {
            return Err(DomainError::InvalidPath(value));
        }
        if value.contains('\\') {
            return Err(DomainError::InvalidPath(value));
        }
        for component in value.split('/') {
            if component.is_empty() || component == "." || component == ".." {
                return Err(DomainError::InvalidPath(value));
            }
        }
        Ok(Self(value))
    }

    /// Get the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The final path component (file or folder name)
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Resolve this relative path against an absolute sync root
    #[must_use]
    pub fn resolve(&self, root: &Path) -> std::path::PathBuf {
        let mut out = root.to_path_buf();
        for component in self.0.split('/') {
            out.push(component);
        }
        out
    }
}

impl Display for RelativePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RelativePath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ============================================================================
// ContentHash
// ============================================================================

/// An MD5 content checksum in lowercase hexadecimal
///
/// Google Drive reports `md5Checksum` for binary file content; the same
/// digest computed locally is the lightweight change indicator used by
/// sync coordinators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Create a validated ContentHash
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidHash`] unless the value is exactly
    /// 32 lowercase hex digits.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.len() != 32 || !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DomainError::InvalidHash(value));
        }
        Ok(Self(value.to_ascii_lowercase()))
    }

    /// Compute the MD5 digest of a byte slice
    #[must_use]
    pub fn of_bytes(data: &[u8]) -> Self {
        let mut hasher = Md5::new();
        hasher.update(data);
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Compute the MD5 digest of a file's content
    ///
    /// Reads the file through a fixed 64 KiB buffer so large files are
    /// never held in memory whole.
    ///
    /// # Errors
    /// Returns the underlying I/O error if the file cannot be read.
    pub fn of_file(path: &Path) -> std::io::Result<Self> {
        let mut file = std::fs::File::open(path)?;
        let mut hasher = Md5::new();
        let mut buf = [0u8; 64 * 1024];
        loop {
            let n = file.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(Self(format!("{:x}", hasher.finalize())))
    }

    /// Get the inner hex string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentHash {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
