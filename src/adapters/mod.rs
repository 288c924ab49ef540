//! External system integrations for Nova Intake.
//!
//! - [`database`] - Document store abstraction layer (trait-based)
//! - [`postgresql`] - PostgreSQL JSONB implementation
//! - [`memory`] - In-process implementation
//! - [`mail`] - Operator notification transport
//!
//! Adapters isolate third-party drivers behind traits so the core services can
//! be tested with in-process implementations.

pub mod database;
pub mod mail;
pub mod memory;
pub mod postgresql;
