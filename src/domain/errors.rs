//! Domain error types
//!
//! This module defines the error hierarchy for Nova Intake.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Nova Intake error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum NovaError {
    /// Configuration-related errors, including "no store connection available"
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Document store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Operator notification errors
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// Malformed input, rejected before any persistence
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl NovaError {
    /// Whether this error means the document store is not configured or reachable
    pub fn is_unavailable(&self) -> bool {
        matches!(self, NovaError::Configuration(_))
            || matches!(self, NovaError::Store(StoreError::ConnectionFailed(_)))
    }
}

/// Document store errors
///
/// Errors that occur when talking to the backing document store.
/// These errors don't expose driver types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to obtain a connection
    #[error("Failed to connect to document store: {0}")]
    ConnectionFailed(String),

    /// Failed to create the schema
    #[error("Failed to initialize schema: {0}")]
    SchemaFailed(String),

    /// Failed to insert a document
    #[error("Failed to insert document: {0}")]
    InsertFailed(String),

    /// Failed to update a document
    #[error("Failed to update document: {0}")]
    UpdateFailed(String),

    /// Failed to query documents
    #[error("Failed to query documents: {0}")]
    QueryFailed(String),

    /// A stored document could not be decoded into its record type
    #[error("Malformed document in collection '{collection}': {message}")]
    MalformedDocument { collection: String, message: String },
}

/// Operator notification errors
///
/// Every variant is recovered locally by the report dispatcher.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// A sender or recipient address could not be parsed
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The message could not be assembled
    #[error("Failed to build message: {0}")]
    MessageBuild(String),

    /// Could not reach the mail relay
    #[error("Failed to connect to mail relay: {0}")]
    ConnectionFailed(String),

    /// The relay rejected the message or the credentials
    #[error("Mail relay rejected the message: {0}")]
    Rejected(String),

    /// The transport timed out
    #[error("Mail transport timeout: {0}")]
    Timeout(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for NovaError {
    fn from(err: std::io::Error) -> Self {
        NovaError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for NovaError {
    fn from(err: serde_json::Error) -> Self {
        NovaError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for NovaError {
    fn from(err: toml::de::Error) -> Self {
        NovaError::Configuration(format!("TOML parse error: {err}"))
    }
}
