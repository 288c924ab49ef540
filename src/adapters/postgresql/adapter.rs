//! PostgreSQL adapter implementing the document store trait
//!
//! Every collection lives in one JSONB table. Filters become containment
//! checks (`doc @> filter`), increments are evaluated in SQL, and upserts run
//! inside a transaction holding an advisory lock keyed on collection and filter.

use crate::adapters::database::traits::{
    stamp_document, DocumentStore, Filter, Mutation, UpsertOutcome,
};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{DocumentRow, DOCUMENT_COLUMNS};
use crate::domain::ids::DocumentId;
use crate::domain::records::RecordKind;
use crate::domain::{NovaError, Result, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

type SqlParam = Box<dyn ToSql + Sync + Send>;

/// PostgreSQL implementation of [`DocumentStore`]
pub struct PostgreSQLStore {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLStore {
    /// Create a new PostgreSQL store
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }
}

/// Builds the SQL expression that applies `mutation` to the `doc` column
///
/// Parameters are appended to `params`; placeholders are numbered from the
/// current length of `params`.
fn mutation_expression(mutation: &Mutation, params: &mut Vec<SqlParam>) -> String {
    let mut expression = "doc".to_string();

    if !mutation.set_fields().is_empty() {
        params.push(Box::new(Value::Object(mutation.set_fields().clone())));
        expression = format!("({expression} || ${}::jsonb)", params.len());
    }

    for (field, delta) in mutation.inc_fields() {
        params.push(Box::new(field.clone()));
        let field_param = params.len();
        params.push(Box::new(*delta));
        let delta_param = params.len();

        expression = format!(
            "jsonb_set({expression}, ARRAY[${field_param}::text], \
             to_jsonb(COALESCE((doc->>(${field_param}::text))::bigint, 0) + ${delta_param}::bigint))"
        );
    }

    expression
}

fn as_refs(params: &[SqlParam]) -> Vec<&(dyn ToSql + Sync)> {
    params
        .iter()
        .map(|p| p.as_ref() as &(dyn ToSql + Sync))
        .collect()
}

#[async_trait]
impl DocumentStore for PostgreSQLStore {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_schema().await
    }

    async fn create(&self, kind: RecordKind, document: Value) -> Result<DocumentId> {
        let (id, document) = stamp_document(document)?;
        let conn = self.client.get_connection().await?;

        let statement = format!(
            "INSERT INTO {} (id, collection, doc) VALUES ($1, $2, $3::jsonb)",
            self.client.documents_table()
        );
        conn.execute(&statement, &[id.as_uuid(), &kind.collection(), &document])
            .await
            .map_err(|e| StoreError::InsertFailed(e.to_string()))?;

        tracing::debug!(collection = %kind, id = %id, "Document inserted into PostgreSQL");
        Ok(id)
    }

    async fn find_one(&self, kind: RecordKind, filter: &Filter) -> Result<Option<Value>> {
        let conn = self.client.get_connection().await?;

        let query = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM {} \
             WHERE collection = $1 AND doc @> $2::jsonb \
             ORDER BY created_at ASC, seq ASC LIMIT 1",
            self.client.documents_table()
        );
        let row = conn
            .query_opt(&query, &[&kind.collection(), &filter.to_json()])
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        row.map(|row| DocumentRow::from_row(&row).map(DocumentRow::into_document))
            .transpose()
    }

    async fn find_recent(
        &self,
        kind: RecordKind,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Value>> {
        let conn = self.client.get_connection().await?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let query = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM {} \
             WHERE collection = $1 AND doc @> $2::jsonb \
             ORDER BY created_at DESC, seq DESC LIMIT $3",
            self.client.documents_table()
        );
        let rows = conn
            .query(&query, &[&kind.collection(), &filter.to_json(), &limit])
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        rows.iter()
            .map(|row| DocumentRow::from_row(row).map(DocumentRow::into_document))
            .collect()
    }

    async fn update(&self, kind: RecordKind, filter: &Filter, mutation: &Mutation) -> Result<u64> {
        if mutation.is_empty() {
            return Ok(0);
        }

        let conn = self.client.get_connection().await?;

        let mut params: Vec<SqlParam> = vec![
            Box::new(kind.collection().to_string()),
            Box::new(filter.to_json()),
        ];
        let expression = mutation_expression(mutation, &mut params);
        let statement = format!(
            "UPDATE {} SET doc = {expression} WHERE collection = $1 AND doc @> $2::jsonb",
            self.client.documents_table()
        );

        let updated = conn
            .execute(&statement, &as_refs(&params))
            .await
            .map_err(|e| StoreError::UpdateFailed(e.to_string()))?;

        Ok(updated)
    }

    async fn upsert(
        &self,
        kind: RecordKind,
        filter: &Filter,
        mutation: &Mutation,
        on_insert: Value,
    ) -> Result<UpsertOutcome> {
        let (id, on_insert) = stamp_document(on_insert)?;
        let table = self.client.documents_table();
        let lock_key = format!("{}:{}", kind.collection(), filter.to_json());

        let mut conn = self.client.get_connection().await?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| StoreError::UpdateFailed(e.to_string()))?;

        tx.execute("SELECT pg_advisory_xact_lock(hashtext($1))", &[&lock_key])
            .await
            .map_err(|e| StoreError::UpdateFailed(format!("Failed to acquire upsert lock: {e}")))?;

        let mut params: Vec<SqlParam> = vec![
            Box::new(kind.collection().to_string()),
            Box::new(filter.to_json()),
        ];
        let expression = mutation_expression(mutation, &mut params);
        let statement = format!(
            "UPDATE {table} SET doc = {expression} WHERE id = ( \
                 SELECT id FROM {table} \
                 WHERE collection = $1 AND doc @> $2::jsonb \
                 ORDER BY created_at ASC, seq ASC LIMIT 1)"
        );

        let updated = tx
            .execute(&statement, &as_refs(&params))
            .await
            .map_err(|e| StoreError::UpdateFailed(e.to_string()))?;

        let outcome = if updated > 0 {
            UpsertOutcome::Updated
        } else {
            let insert = format!("INSERT INTO {table} (id, collection, doc) VALUES ($1, $2, $3::jsonb)");
            tx.execute(&insert, &[id.as_uuid(), &kind.collection(), &on_insert])
                .await
                .map_err(|e| StoreError::InsertFailed(e.to_string()))?;
            UpsertOutcome::Inserted(id)
        };

        tx.commit()
            .await
            .map_err(|e| StoreError::UpdateFailed(format!("Failed to commit upsert: {e}")))?;

        Ok(outcome)
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        let conn = self.client.get_connection().await?;

        let query = format!(
            "SELECT DISTINCT collection FROM {} ORDER BY collection",
            self.client.documents_table()
        );
        let rows = conn
            .query(&query, &[])
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        rows.iter()
            .map(|row| {
                row.try_get::<_, String>(0)
                    .map_err(|e| NovaError::from(StoreError::QueryFailed(e.to_string())))
            })
            .collect()
    }

    fn database_name(&self) -> &str {
        self.client.schema()
    }
}
