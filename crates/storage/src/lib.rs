//! Storage abstraction and implementations for ironlog.
//!
//! This crate provides a trait-based storage interface with a JSON file
//! reference implementation and an in-memory backend.

#![warn(missing_docs)]

pub mod trait_;
#[cfg(feature = "json")]
pub mod json_storage;
pub mod memory_storage;

pub use trait_::{Storage, StorageError, Result};
#[cfg(feature = "json")]
pub use json_storage::JsonStorage;
pub use memory_storage::MemoryStorage;
