//! Document store abstraction layer
//!
//! This module provides a trait-based abstraction for persistence, allowing
//! Nova Intake to run against PostgreSQL, an in-memory store, or no store at all.

pub mod factory;
pub mod traits;
pub mod typed;
pub mod unavailable;

pub use factory::create_document_store;
pub use traits::{DocumentStore, Filter, Mutation, UpsertOutcome, ID_FIELD};
pub use typed::{create_record, find_recent_records, find_record, Stored};
pub use unavailable::UnavailableStore;
