//! In-memory document store
//!
//! This module provides a process-local store for development and tests.

pub mod store;

pub use store::MemoryStore;
