//! PostgreSQL document store
//!
//! This module stores every record collection in a single JSONB table.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLStore;
pub use client::PostgreSQLClient;
pub use models::DocumentRow;
