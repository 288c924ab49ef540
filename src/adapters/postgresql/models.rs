//! PostgreSQL row models
//!
//! Maps rows of the `documents` table to the JSON documents the store hands out.

use crate::adapters::database::traits::ID_FIELD;
use crate::domain::{Result, StoreError};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio_postgres::Row;
use uuid::Uuid;

/// Columns selected for every document read
pub const DOCUMENT_COLUMNS: &str = "id, collection, doc, created_at";

/// One row of the `documents` table
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRow {
    /// Primary key, mirrored into the document's `_id`
    pub id: Uuid,

    /// Collection name
    pub collection: String,

    /// Document body
    pub doc: Value,

    /// Insertion time
    pub created_at: DateTime<Utc>,
}

impl DocumentRow {
    /// Decode a row selected with [`DOCUMENT_COLUMNS`]
    ///
    /// # Errors
    ///
    /// Returns `StoreError::QueryFailed` if a column has an unexpected type.
    pub fn from_row(row: &Row) -> Result<Self> {
        let column_error = |e: tokio_postgres::Error| StoreError::QueryFailed(e.to_string());

        Ok(Self {
            id: row.try_get("id").map_err(column_error)?,
            collection: row.try_get("collection").map_err(column_error)?,
            doc: row.try_get("doc").map_err(column_error)?,
            created_at: row.try_get("created_at").map_err(column_error)?,
        })
    }

    /// The stored document, with `_id` taken from the primary key
    pub fn into_document(self) -> Value {
        let mut doc = self.doc;
        if let Some(object) = doc.as_object_mut() {
            object.insert(ID_FIELD.to_string(), Value::from(self.id.to_string()));
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_document_sets_id_from_primary_key() {
        let id = Uuid::new_v4();
        let row = DocumentRow {
            id,
            collection: "upload".to_string(),
            doc: json!({"_id": "stale", "filename": "a.txt"}),
            created_at: Utc::now(),
        };

        let document = row.into_document();
        assert_eq!(document["_id"], json!(id.to_string()));
        assert_eq!(document["filename"], json!("a.txt"));
    }
}
