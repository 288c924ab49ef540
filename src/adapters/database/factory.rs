//! Document store factory
//!
//! This module selects the document store implementation based on configuration.

use crate::adapters::database::traits::DocumentStore;
use crate::adapters::database::unavailable::UnavailableStore;
use crate::adapters::memory::MemoryStore;
use crate::adapters::postgresql::{PostgreSQLClient, PostgreSQLStore};
use crate::config::schema::{DatabaseTarget, NovaConfig};
use std::sync::Arc;

/// Create a document store based on the configuration
///
/// This factory never fails. When the PostgreSQL target is selected but no
/// usable connection settings are present, an [`UnavailableStore`] is returned
/// so the service can start and report 503 for store-backed requests.
///
/// # Returns
///
/// Returns an Arc-wrapped trait object that implements [`DocumentStore`]
pub fn create_document_store(config: &NovaConfig) -> Arc<dyn DocumentStore> {
    match config.database_target {
        DatabaseTarget::Memory => {
            tracing::info!("Creating in-memory document store");
            Arc::new(MemoryStore::new())
        }
        DatabaseTarget::PostgreSQL => {
            let Some(pg_config) = config.postgresql.as_ref() else {
                tracing::warn!(
                    "No [postgresql] configuration found; store-backed endpoints will be unavailable"
                );
                return Arc::new(UnavailableStore::default());
            };

            match PostgreSQLClient::new(pg_config.clone()) {
                Ok(client) => {
                    tracing::info!(
                        connection = %client.connection_string_safe(),
                        schema = %client.schema(),
                        "Creating PostgreSQL document store"
                    );
                    Arc::new(PostgreSQLStore::new(client))
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "PostgreSQL client could not be created; store-backed endpoints will be unavailable"
                    );
                    Arc::new(UnavailableStore::new(e.to_string()))
                }
            }
        }
    }
}
