//! In-process document store
//!
//! Keeps every collection in memory behind a single lock. Used for local
//! development (`database_target = "memory"`) and as the substitute store in
//! tests. All mutations, including upserts, hold the write lock for the whole
//! decide-and-write sequence, which makes them atomic.

use crate::adapters::database::traits::{
    stamp_document, DocumentStore, Filter, Mutation, UpsertOutcome,
};
use crate::domain::ids::DocumentId;
use crate::domain::records::RecordKind;
use crate::domain::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory implementation of [`DocumentStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Documents per collection, in insertion order
    collections: RwLock<HashMap<RecordKind, Vec<Value>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `kind`'s collection
    pub async fn count(&self, kind: RecordKind) -> usize {
        self.collections
            .read()
            .await
            .get(&kind)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn create(&self, kind: RecordKind, document: Value) -> Result<DocumentId> {
        let (id, document) = stamp_document(document)?;
        self.collections
            .write()
            .await
            .entry(kind)
            .or_default()
            .push(document);

        tracing::debug!(collection = %kind, id = %id, "Document created in memory store");
        Ok(id)
    }

    async fn find_one(&self, kind: RecordKind, filter: &Filter) -> Result<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&kind)
            .and_then(|documents| documents.iter().find(|doc| filter.matches(doc)))
            .cloned())
    }

    async fn find_recent(
        &self,
        kind: RecordKind,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&kind)
            .map(|documents| {
                documents
                    .iter()
                    .rev()
                    .filter(|doc| filter.matches(doc))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update(&self, kind: RecordKind, filter: &Filter, mutation: &Mutation) -> Result<u64> {
        let mut collections = self.collections.write().await;
        let mut matched = 0;
        if let Some(documents) = collections.get_mut(&kind) {
            for document in documents.iter_mut().filter(|doc| filter.matches(doc)) {
                mutation.apply_to(document);
                matched += 1;
            }
        }
        Ok(matched)
    }

    async fn upsert(
        &self,
        kind: RecordKind,
        filter: &Filter,
        mutation: &Mutation,
        on_insert: Value,
    ) -> Result<UpsertOutcome> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(kind).or_default();

        if let Some(existing) = documents.iter_mut().find(|doc| filter.matches(doc)) {
            mutation.apply_to(existing);
            return Ok(UpsertOutcome::Updated);
        }

        let (id, document) = stamp_document(on_insert)?;
        documents.push(document);
        Ok(UpsertOutcome::Inserted(id))
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        let collections = self.collections.read().await;
        let mut names: Vec<String> = collections
            .iter()
            .filter(|(_, documents)| !documents.is_empty())
            .map(|(kind, _)| kind.collection().to_string())
            .collect();
        names.sort();
        Ok(names)
    }

    fn database_name(&self) -> &str {
        "memory"
    }
}
