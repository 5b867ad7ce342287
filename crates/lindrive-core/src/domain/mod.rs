//! Domain types for lindrive
//!
//! Pure types with no I/O dependencies: validated newtypes for remote
//! identifiers and paths, plus the persisted per-file record.

pub mod errors;
pub mod newtypes;
pub mod record;

pub use errors::DomainError;
pub use newtypes::{ContentHash, RelativePath, RemoteId};
pub use record::RemoteFileRecord;
