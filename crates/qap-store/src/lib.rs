//! # qap-store
//!
//! Durable key/value backends and the repositories built on top of them.
//! Supports two backends:
//!
//! - **memory**: In-process map using [dashmap](https://crates.io/crates/dashmap)
//! - **file**: A JSON document on disk that survives restarts
//!
//! The backend is selected at runtime based on configuration; repositories
//! only see the [`StoreManager`].

#[cfg(feature = "file")]
pub mod file;
pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
pub mod repositories;

pub use provider::StoreManager;
