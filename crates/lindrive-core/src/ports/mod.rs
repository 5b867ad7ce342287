//! Port definitions (trait interfaces for adapters)

pub mod remote_ops;

pub use remote_ops::{RemoteFileOps, RemoteResource, FOLDER_MIME_TYPE};
