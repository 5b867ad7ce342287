//! lindrive State - durable local sync-state store
//!
//! Persists the mapping from local relative paths to their last known
//! remote identity (`{id, md5}`) as a single JSON file, rewritten
//! write-through on every mutation. The store is the sole durable source
//! of truth for "what was last synchronized"; the Monitor and Poller
//! both mutate it concurrently, so every operation is serialized under
//! one exclusive lock.

pub mod store;

pub use store::StateStore;
