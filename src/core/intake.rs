//! Upload intake
//!
//! Records the metadata of an uploaded file and credits the uploading client.

use crate::adapters::database::{create_record, find_recent_records, DocumentStore, Filter};
use crate::core::digest::ContentDigest;
use crate::core::ledger::EngagementLedger;
use crate::domain::ids::{ClientId, DocumentId, Sha256Digest};
use crate::domain::records::UploadRecord;
use crate::domain::{NovaError, Result};
use std::sync::Arc;

/// Content type recorded when the client supplies none
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Default page size for the recent-uploads listing
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Largest page the recent-uploads listing returns
pub const MAX_RECENT_LIMIT: usize = 100;

/// A fully read and hashed upload, ready to be recorded
#[derive(Debug, Clone)]
pub struct IncomingUpload {
    pub client_id: ClientId,
    pub filename: String,
    pub content_type: Option<String>,
    pub digest: ContentDigest,
}

/// Identifier and checksum of a recorded upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub id: DocumentId,
    pub sha256: Sha256Digest,
    pub size_bytes: u64,
}

/// Records uploads and their ledger credit
#[derive(Clone)]
pub struct UploadService {
    store: Arc<dyn DocumentStore>,
    ledger: EngagementLedger,
}

impl UploadService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            ledger: EngagementLedger::new(Arc::clone(&store)),
            store,
        }
    }

    /// The ledger credited by this service
    pub fn ledger(&self) -> &EngagementLedger {
        &self.ledger
    }

    /// Persist the upload's metadata, then credit the client
    ///
    /// The two writes are separate store operations. If the credit fails the
    /// upload stays recorded without it and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns `NovaError::Validation` for an empty filename,
    /// `NovaError::Configuration` when no store is available, or a store error.
    pub async fn record_upload(&self, upload: IncomingUpload) -> Result<UploadReceipt> {
        let filename = upload.filename.trim();
        if filename.is_empty() {
            return Err(NovaError::Validation("filename cannot be empty".to_string()));
        }

        let content_type = upload
            .content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let record = UploadRecord::builder()
            .client_id(upload.client_id.clone())
            .filename(filename)
            .content_type(content_type)
            .size_bytes(upload.digest.size_bytes)
            .sha256(upload.digest.sha256.clone())
            .build()
            .map_err(NovaError::Validation)?;

        let id = create_record(self.store.as_ref(), &record).await?;

        tracing::info!(
            id = %id,
            client_id = %upload.client_id,
            filename = %record.filename,
            size_bytes = record.size_bytes,
            sha256 = %record.sha256,
            "Upload recorded"
        );

        if let Err(e) = self.ledger.award_upload(&upload.client_id).await {
            tracing::error!(
                id = %id,
                client_id = %upload.client_id,
                error = %e,
                "Upload recorded but ledger credit failed"
            );
            return Err(e);
        }

        Ok(UploadReceipt {
            id,
            sha256: record.sha256,
            size_bytes: record.size_bytes,
        })
    }

    /// Most recent uploads, newest first, capped at [`MAX_RECENT_LIMIT`]
    pub async fn recent(&self, limit: usize) -> Result<Vec<UploadRecord>> {
        let limit = limit.min(MAX_RECENT_LIMIT);
        find_recent_records::<UploadRecord>(self.store.as_ref(), &Filter::all(), limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::database::UnavailableStore;
    use crate::adapters::memory::MemoryStore;
    use crate::core::digest::StreamingDigest;
    use crate::domain::records::{RecordKind, DEFAULT_VERDICT};

    fn upload(client: &str, filename: &str, body: &[u8]) -> IncomingUpload {
        let mut digest = StreamingDigest::new();
        digest.update(body);
        IncomingUpload {
            client_id: ClientId::new(client).unwrap(),
            filename: filename.to_string(),
            content_type: None,
            digest: digest.finalize(),
        }
    }

    #[tokio::test]
    async fn test_record_upload_persists_metadata_and_credits() {
        let store = Arc::new(MemoryStore::new());
        let service = UploadService::new(store.clone());

        let receipt = service
            .record_upload(upload("c1", "report.pdf", b"%PDF-1.7"))
            .await
            .unwrap();
        assert_eq!(receipt.size_bytes, 8);

        let recent = service.recent(10).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].filename, "report.pdf");
        assert_eq!(recent[0].content_type, DEFAULT_CONTENT_TYPE);
        assert_eq!(recent[0].verdict, DEFAULT_VERDICT);
        assert_eq!(recent[0].sha256, receipt.sha256);

        let progress = service
            .ledger()
            .progress(&ClientId::new("c1").unwrap())
            .await
            .unwrap();
        assert_eq!((progress.points, progress.uploads_count), (10, 1));
        assert_eq!(store.count(RecordKind::Upload).await, 1);
    }

    #[tokio::test]
    async fn test_identical_content_is_credited_each_time() {
        let service = UploadService::new(Arc::new(MemoryStore::new()));
        for _ in 0..2 {
            service
                .record_upload(upload("c1", "same.txt", b"same"))
                .await
                .unwrap();
        }

        let progress = service
            .ledger()
            .progress(&ClientId::new("c1").unwrap())
            .await
            .unwrap();
        assert_eq!(progress.points, 20);
    }

    #[tokio::test]
    async fn test_empty_filename_rejected_before_persistence() {
        let store = Arc::new(MemoryStore::new());
        let service = UploadService::new(store.clone());

        let result = service.record_upload(upload("c1", "  ", b"x")).await;
        assert!(matches!(result, Err(NovaError::Validation(_))));
        assert_eq!(store.count(RecordKind::Upload).await, 0);
    }

    #[tokio::test]
    async fn test_recent_is_newest_first_and_capped() {
        let service = UploadService::new(Arc::new(MemoryStore::new()));
        for n in 0..3 {
            service
                .record_upload(upload("c1", &format!("f{n}.txt"), b"x"))
                .await
                .unwrap();
        }

        let recent = service.recent(2).await.unwrap();
        let names: Vec<_> = recent.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["f2.txt", "f1.txt"]);
    }

    #[tokio::test]
    async fn test_unavailable_store_is_configuration_error() {
        let service = UploadService::new(Arc::new(UnavailableStore::default()));
        let result = service.record_upload(upload("c1", "a.txt", b"x")).await;
        assert!(result.unwrap_err().is_unavailable());
    }
}
