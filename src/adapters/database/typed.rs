//! Typed record access on top of [`DocumentStore`]
//!
//! The store itself only sees JSON documents; these helpers encode and decode
//! [`Record`] types and route them to the collection for their kind.

use crate::adapters::database::traits::{DocumentStore, Filter, ID_FIELD};
use crate::domain::ids::DocumentId;
use crate::domain::records::Record;
use crate::domain::{NovaError, Result, StoreError};
use serde_json::Value;

/// A decoded record together with its store identifier
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<R> {
    pub id: DocumentId,
    pub record: R,
}

/// Persist a record in its kind's collection
///
/// # Errors
///
/// Returns an error if the record cannot be encoded or the insert fails.
pub async fn create_record<R: Record>(store: &dyn DocumentStore, record: &R) -> Result<DocumentId> {
    let document = serde_json::to_value(record)?;
    store.create(R::KIND, document).await
}

/// Find and decode the first record matching `filter`
pub async fn find_record<R: Record>(
    store: &dyn DocumentStore,
    filter: &Filter,
) -> Result<Option<Stored<R>>> {
    match store.find_one(R::KIND, filter).await? {
        Some(document) => decode::<R>(document).map(Some),
        None => Ok(None),
    }
}

/// Find and decode up to `limit` records, newest first
pub async fn find_recent_records<R: Record>(
    store: &dyn DocumentStore,
    filter: &Filter,
    limit: usize,
) -> Result<Vec<R>> {
    store
        .find_recent(R::KIND, filter, limit)
        .await?
        .into_iter()
        .map(|document| decode::<R>(document).map(|stored| stored.record))
        .collect()
}

/// Split a raw document into its identifier and decoded record
pub fn decode<R: Record>(mut document: Value) -> Result<Stored<R>> {
    let malformed = |message: String| {
        NovaError::Store(StoreError::MalformedDocument {
            collection: R::KIND.collection().to_string(),
            message,
        })
    };

    let id = document
        .as_object_mut()
        .and_then(|object| object.remove(ID_FIELD))
        .and_then(|value| value.as_str().map(str::to_string))
        .ok_or_else(|| malformed(format!("missing {ID_FIELD}")))?
        .parse::<DocumentId>()
        .map_err(malformed)?;

    let record = serde_json::from_value(document).map_err(|e| malformed(e.to_string()))?;

    Ok(Stored { id, record })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::UserProgress;
    use serde_json::json;

    #[test]
    fn test_decode_strips_id() {
        let id = DocumentId::generate();
        let stored: Stored<UserProgress> = decode(json!({
            "_id": id.to_string(),
            "client_id": "c1",
            "points": 20,
            "uploads_count": 2,
            "badges": []
        }))
        .unwrap();

        assert_eq!(stored.id, id);
        assert_eq!(stored.record.points, 20);
        assert_eq!(stored.record.uploads_count, 2);
    }

    #[test]
    fn test_decode_missing_id_is_malformed() {
        let result = decode::<UserProgress>(json!({"client_id": "c1"}));
        assert!(matches!(
            result,
            Err(NovaError::Store(StoreError::MalformedDocument { .. }))
        ));
    }

    #[test]
    fn test_decode_wrong_shape_is_malformed() {
        let result = decode::<UserProgress>(json!({
            "_id": DocumentId::generate().to_string(),
            "points": "lots"
        }));
        assert!(result.is_err());
    }
}
