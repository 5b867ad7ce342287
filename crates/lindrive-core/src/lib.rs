//! lindrive Core - Domain logic and port definitions
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain newtypes** - `RemoteId`, `RelativePath`, `ContentHash`
//! - **Domain records** - `RemoteFileRecord`, the persisted per-file state
//! - **Port definitions** - `RemoteFileOps`, the trait adapter crates implement
//! - **Configuration** - typed config loaded from the JSON config file
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure types with no I/O. Ports define trait
//! interfaces that adapter crates (`lindrive-drive`) implement. The state
//! store (`lindrive-state`) consumes the domain types directly.

pub mod config;
pub mod domain;
pub mod ports;
