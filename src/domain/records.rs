//! Persisted record types
//!
//! Each record kind maps to one collection in the document store. The
//! collection name is the lowercase of the kind name (`UploadRecord` is stored
//! under `upload`, `UserProgress` under `userprogress`, and so on).

use super::ids::{ClientId, EmailAddress, Sha256Digest};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict recorded for every accepted upload
pub const DEFAULT_VERDICT: &str = "scanned";

/// Record kinds known to the document store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Upload metadata
    Upload,
    /// Per-client engagement ledger
    UserProgress,
    /// Support reports
    Report,
    /// Assistant chat transcript lines
    ChatMessage,
}

impl RecordKind {
    /// All kinds, in declaration order
    pub const ALL: [RecordKind; 4] = [
        RecordKind::Upload,
        RecordKind::UserProgress,
        RecordKind::Report,
        RecordKind::ChatMessage,
    ];

    /// Collection name for this kind
    pub fn collection(&self) -> &'static str {
        match self {
            RecordKind::Upload => "upload",
            RecordKind::UserProgress => "userprogress",
            RecordKind::Report => "report",
            RecordKind::ChatMessage => "chatmessage",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

/// A typed record that can be persisted in the document store
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// Collection this record lives in
    const KIND: RecordKind;
}

/// Metadata for an uploaded file
///
/// Only security-relevant facts are kept; the file content itself is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    /// Uploading client, when known
    #[serde(default)]
    pub client_id: Option<ClientId>,

    /// Original filename as supplied by the client
    pub filename: String,

    /// MIME type as supplied by the client
    pub content_type: String,

    /// Exact byte count of the uploaded content
    pub size_bytes: u64,

    /// SHA-256 digest of exactly `size_bytes` bytes
    pub sha256: Sha256Digest,

    /// Scan result or status
    #[serde(default = "default_verdict")]
    pub verdict: String,

    #[serde(default)]
    pub notes: Option<String>,
}

impl Record for UploadRecord {
    const KIND: RecordKind = RecordKind::Upload;
}

impl UploadRecord {
    /// Creates a new builder for constructing an UploadRecord
    pub fn builder() -> UploadRecordBuilder {
        UploadRecordBuilder::default()
    }
}

/// Builder for constructing UploadRecord instances
#[derive(Debug, Default)]
pub struct UploadRecordBuilder {
    client_id: Option<ClientId>,
    filename: Option<String>,
    content_type: Option<String>,
    size_bytes: Option<u64>,
    sha256: Option<Sha256Digest>,
    verdict: Option<String>,
    notes: Option<String>,
}

impl UploadRecordBuilder {
    /// Creates a new UploadRecordBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the uploading client
    pub fn client_id(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Sets the filename
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Sets the content type
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the byte count
    pub fn size_bytes(mut self, size_bytes: u64) -> Self {
        self.size_bytes = Some(size_bytes);
        self
    }

    /// Sets the digest
    pub fn sha256(mut self, sha256: Sha256Digest) -> Self {
        self.sha256 = Some(sha256);
        self
    }

    /// Overrides the default verdict
    pub fn verdict(mut self, verdict: impl Into<String>) -> Self {
        self.verdict = Some(verdict.into());
        self
    }

    /// Sets free-form notes
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Builds the UploadRecord
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is missing
    pub fn build(self) -> Result<UploadRecord, String> {
        Ok(UploadRecord {
            client_id: self.client_id,
            filename: self.filename.ok_or("filename is required")?,
            content_type: self.content_type.ok_or("content_type is required")?,
            size_bytes: self.size_bytes.ok_or("size_bytes is required")?,
            sha256: self.sha256.ok_or("sha256 is required")?,
            verdict: self.verdict.unwrap_or_else(default_verdict),
            notes: self.notes,
        })
    }
}

/// Engagement progress for a single client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    pub client_id: ClientId,

    /// Accumulated reward points
    #[serde(default)]
    pub points: u64,

    /// Number of uploads credited
    #[serde(default)]
    pub uploads_count: u64,

    /// Awarded badges, in award order
    #[serde(default)]
    pub badges: Vec<String>,
}

impl Record for UserProgress {
    const KIND: RecordKind = RecordKind::UserProgress;
}

impl UserProgress {
    /// Progress for a client that has never uploaded
    pub fn empty(client_id: ClientId) -> Self {
        Self {
            client_id,
            points: 0,
            uploads_count: 0,
            badges: Vec::new(),
        }
    }
}

/// Problem or feedback report submitted by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub client_id: Option<ClientId>,

    pub subject: String,

    pub message: String,

    /// Reply-to address supplied by the reporter
    #[serde(default)]
    pub from_email: Option<EmailAddress>,

    /// Whether the operator notification was confirmed delivered
    #[serde(default)]
    pub sent_to_owner: bool,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Report {
    const KIND: RecordKind = RecordKind::Report;
}

impl Report {
    /// Creates an undelivered report stamped with the current time
    pub fn new(
        client_id: Option<ClientId>,
        subject: impl Into<String>,
        message: impl Into<String>,
        from_email: Option<EmailAddress>,
    ) -> Self {
        Self {
            client_id,
            subject: subject.into(),
            message: message.into(),
            from_email,
            sent_to_owner: false,
            created_at: Some(Utc::now()),
        }
    }
}

/// Speaker of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One line of an assistant conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,

    pub message: String,

    #[serde(default)]
    pub session_id: Option<String>,
}

impl Record for ChatMessage {
    const KIND: RecordKind = RecordKind::ChatMessage;
}

fn default_verdict() -> String {
    DEFAULT_VERDICT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_collection_names_are_lowercase_kind_names() {
        assert_eq!(RecordKind::Upload.collection(), "upload");
        assert_eq!(RecordKind::UserProgress.collection(), "userprogress");
        assert_eq!(RecordKind::Report.collection(), "report");
        assert_eq!(RecordKind::ChatMessage.collection(), "chatmessage");
        assert_eq!(RecordKind::ALL.len(), 4);
    }

    #[test]
    fn test_upload_builder_defaults_verdict() {
        let record = UploadRecord::builder()
            .filename("empty.bin")
            .content_type("application/octet-stream")
            .size_bytes(0)
            .sha256(Sha256Digest::new(EMPTY_SHA256).unwrap())
            .build()
            .unwrap();

        assert_eq!(record.verdict, "scanned");
        assert!(record.client_id.is_none());
        assert!(record.notes.is_none());
    }

    #[test]
    fn test_upload_builder_missing_field() {
        let result = UploadRecord::builder().filename("x").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_upload_record_serialized_shape() {
        let record = UploadRecord::builder()
            .client_id(ClientId::new("c1").unwrap())
            .filename("a.txt")
            .content_type("text/plain")
            .size_bytes(0)
            .sha256(Sha256Digest::new(EMPTY_SHA256).unwrap())
            .build()
            .unwrap();

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["client_id"], json!("c1"));
        assert_eq!(value["sha256"], json!(EMPTY_SHA256));
        assert_eq!(value["verdict"], json!("scanned"));
        assert_eq!(value["notes"], json!(null));
    }

    #[test]
    fn test_user_progress_missing_counters_default_to_zero() {
        let progress: UserProgress = serde_json::from_value(json!({"client_id": "c9"})).unwrap();
        assert_eq!(progress, UserProgress::empty(ClientId::new("c9").unwrap()));
    }

    #[test]
    fn test_report_starts_unsent() {
        let report = Report::new(None, "Broken upload", "It failed", None);
        assert!(!report.sent_to_owner);
        assert!(report.created_at.is_some());
    }

    #[test]
    fn test_report_rejects_malformed_stored_email() {
        let result = serde_json::from_value::<Report>(json!({
            "subject": "s",
            "message": "m",
            "from_email": "nope"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_chat_role_serialization() {
        let message = ChatMessage {
            role: ChatRole::Assistant,
            message: "hello".to_string(),
            session_id: None,
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], json!("assistant"));
    }
}
