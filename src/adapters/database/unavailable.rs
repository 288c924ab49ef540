//! Stand-in store used when no database is configured
//!
//! Every operation fails with `NovaError::Configuration`, which the HTTP layer
//! surfaces as a service-unavailable response instead of crashing the process.

use crate::adapters::database::traits::{DocumentStore, Filter, Mutation, UpsertOutcome};
use crate::domain::ids::DocumentId;
use crate::domain::records::RecordKind;
use crate::domain::{NovaError, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Document store with no connection behind it
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    /// Create an unavailable store that reports `reason` on every call
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> NovaError {
        NovaError::Configuration(self.reason.clone())
    }
}

impl Default for UnavailableStore {
    fn default() -> Self {
        Self::new("Database not configured")
    }
}

#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn test_connection(&self) -> Result<()> {
        Err(self.error())
    }

    async fn ensure_schema(&self) -> Result<()> {
        Err(self.error())
    }

    async fn create(&self, _kind: RecordKind, _document: Value) -> Result<DocumentId> {
        Err(self.error())
    }

    async fn find_one(&self, _kind: RecordKind, _filter: &Filter) -> Result<Option<Value>> {
        Err(self.error())
    }

    async fn find_recent(
        &self,
        _kind: RecordKind,
        _filter: &Filter,
        _limit: usize,
    ) -> Result<Vec<Value>> {
        Err(self.error())
    }

    async fn update(
        &self,
        _kind: RecordKind,
        _filter: &Filter,
        _mutation: &Mutation,
    ) -> Result<u64> {
        Err(self.error())
    }

    async fn upsert(
        &self,
        _kind: RecordKind,
        _filter: &Filter,
        _mutation: &Mutation,
        _on_insert: Value,
    ) -> Result<UpsertOutcome> {
        Err(self.error())
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        Err(self.error())
    }

    fn database_name(&self) -> &str {
        "unconfigured"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_every_operation_reports_configuration_error() {
        let store = UnavailableStore::default();

        let created = store.create(RecordKind::Upload, json!({})).await;
        assert!(matches!(created, Err(NovaError::Configuration(_))));

        let found = store.find_one(RecordKind::Report, &Filter::all()).await;
        assert!(matches!(found, Err(NovaError::Configuration(_))));

        let upserted = store
            .upsert(RecordKind::UserProgress, &Filter::all(), &Mutation::new(), json!({}))
            .await;
        assert!(matches!(upserted, Err(NovaError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_reason_is_reported() {
        let store = UnavailableStore::new("postgresql section missing");
        let err = store.test_connection().await.unwrap_err();
        assert!(err.to_string().contains("postgresql section missing"));
    }
}
