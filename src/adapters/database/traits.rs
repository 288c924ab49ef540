//! Document store abstraction traits
//!
//! This module defines the trait that document store adapters must implement,
//! together with the filter and mutation types they accept.

use crate::domain::ids::DocumentId;
use crate::domain::records::RecordKind;
use crate::domain::{NovaError, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Field holding the store-generated identifier inside every document
pub const ID_FIELD: &str = "_id";

/// Assign a fresh identifier to `document`, overwriting any existing one
///
/// # Errors
///
/// Returns `NovaError::Validation` if `document` is not a JSON object.
pub fn stamp_document(document: Value) -> Result<(DocumentId, Value)> {
    let Value::Object(mut object) = document else {
        return Err(NovaError::Validation(
            "documents must be JSON objects".to_string(),
        ));
    };
    let id = DocumentId::generate();
    object.insert(ID_FIELD.to_string(), Value::from(id.to_string()));
    Ok((id, Value::Object(object)))
}

/// Field-equality filter
///
/// A document matches when every listed field is present and equal to the
/// given value. An empty filter matches every document in the collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fields: Map<String, Value>,
}

impl Filter {
    /// Matches every document
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches documents whose `field` equals `value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and(field, value)
    }

    /// Matches the single document with the given identifier
    pub fn by_id(id: DocumentId) -> Self {
        Self::eq(ID_FIELD, id.to_string())
    }

    /// Adds another equality condition
    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// The equality conditions
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Whether `document` satisfies every condition
    pub fn matches(&self, document: &Value) -> bool {
        self.fields
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }

    /// The filter as a JSON object, suitable for containment queries
    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

/// Partial update applied to matching documents
///
/// `set` replaces field values; `inc` adds to numeric fields (missing fields
/// count as zero). Stores must apply increments atomically with respect to
/// concurrent mutations of the same document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mutation {
    set: Map<String, Value>,
    inc: BTreeMap<String, i64>,
}

impl Mutation {
    /// Creates an empty mutation
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces `field` with `value`
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.insert(field.into(), value.into());
        self
    }

    /// Adds `delta` to the numeric `field`
    pub fn inc(mut self, field: impl Into<String>, delta: i64) -> Self {
        *self.inc.entry(field.into()).or_insert(0) += delta;
        self
    }

    /// Fields to replace
    pub fn set_fields(&self) -> &Map<String, Value> {
        &self.set
    }

    /// Fields to increment
    pub fn inc_fields(&self) -> &BTreeMap<String, i64> {
        &self.inc
    }

    /// Whether this mutation changes nothing
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.inc.is_empty()
    }

    /// Applies the mutation to an in-memory document
    pub fn apply_to(&self, document: &mut Value) {
        let Some(object) = document.as_object_mut() else {
            return;
        };

        for (field, value) in &self.set {
            object.insert(field.clone(), value.clone());
        }

        for (field, delta) in &self.inc {
            let current = object.get(field).and_then(Value::as_i64).unwrap_or(0);
            object.insert(field.clone(), Value::from(current + delta));
        }
    }
}

/// Result of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No document matched; a new one was inserted
    Inserted(DocumentId),
    /// An existing document was mutated in place
    Updated,
}

/// Document store client trait
///
/// This trait defines the interface that all document store adapters must
/// implement. Documents are JSON objects grouped into one collection per
/// [`RecordKind`]; the store owns the [`ID_FIELD`] of every document it creates.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Test the store connection
    ///
    /// # Errors
    ///
    /// Returns an error if the connection test fails.
    async fn test_connection(&self) -> Result<()>;

    /// Ensure the tables/collections exist, creating them if necessary
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    async fn ensure_schema(&self) -> Result<()>;

    /// Persist a new document and return its generated identifier
    ///
    /// Any [`ID_FIELD`] already present in `document` is overwritten.
    ///
    /// # Errors
    ///
    /// Returns `NovaError::Configuration` when no store is available, or a
    /// store error if the insert fails.
    async fn create(&self, kind: RecordKind, document: Value) -> Result<DocumentId>;

    /// Find the first document matching `filter`
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(document))` if found, `Ok(None)` if not found.
    async fn find_one(&self, kind: RecordKind, filter: &Filter) -> Result<Option<Value>>;

    /// Find up to `limit` documents matching `filter`, newest first
    async fn find_recent(&self, kind: RecordKind, filter: &Filter, limit: usize)
        -> Result<Vec<Value>>;

    /// Apply `mutation` to every document matching `filter`
    ///
    /// # Returns
    ///
    /// Returns the number of documents that matched.
    async fn update(&self, kind: RecordKind, filter: &Filter, mutation: &Mutation) -> Result<u64>;

    /// Atomically mutate the first document matching `filter`, or insert
    /// `on_insert` when none matches
    ///
    /// The decision and the write happen as one storage-level operation, so
    /// concurrent upserts on the same filter never lose increments and never
    /// insert duplicates.
    async fn upsert(
        &self,
        kind: RecordKind,
        filter: &Filter,
        mutation: &Mutation,
        on_insert: Value,
    ) -> Result<UpsertOutcome>;

    /// Names of collections that currently hold documents
    async fn list_collections(&self) -> Result<Vec<String>>;

    /// Human-readable name of the backing database
    fn database_name(&self) -> &str;
}
