//! Shared handler state

use crate::adapters::database::{create_document_store, DocumentStore};
use crate::config::schema::{DatabaseTarget, NovaConfig};
use crate::core::{ReportDispatcher, UploadService};
use crate::domain::Result;
use std::sync::Arc;

/// State shared by every request handler
///
/// Holds the process-wide store handle; it is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub uploads: UploadService,
    pub reports: ReportDispatcher,
    /// Whether a database connection string was configured
    pub database_url_set: bool,
}

impl AppState {
    /// Wire services around `store`
    pub fn new(store: Arc<dyn DocumentStore>, reports: ReportDispatcher) -> Self {
        Self {
            uploads: UploadService::new(Arc::clone(&store)),
            store,
            reports,
            database_url_set: false,
        }
    }

    /// Build the store and services described by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the notification settings are invalid.
    pub fn from_config(config: &NovaConfig) -> Result<Self> {
        let store = create_document_store(config);
        let reports = ReportDispatcher::from_config(Arc::clone(&store), &config.notification)?;

        let mut state = Self::new(store, reports);
        state.database_url_set = config.database_target == DatabaseTarget::PostgreSQL
            && config.postgresql.is_some();
        Ok(state)
    }
}
