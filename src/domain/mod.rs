//! Domain models and types for Nova Intake.
//!
//! This module contains the core domain models, types, and business rules.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ClientId`], [`DocumentId`], [`Sha256Digest`], [`EmailAddress`])
//! - **Persisted records** ([`UploadRecord`], [`UserProgress`], [`Report`], [`ChatMessage`])
//! - **Error types** ([`NovaError`], [`StoreError`], [`DeliveryError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Values are validated once, at construction, so nothing malformed reaches the store:
//!
//! ```rust
//! use nova_intake::domain::{ClientId, EmailAddress};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client_id = ClientId::new("client-42")?;
//! let reply_to = EmailAddress::new("ops@nova.example")?;
//! assert!(EmailAddress::new("not-an-email").is_err());
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod records;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{DeliveryError, NovaError, StoreError};
pub use ids::{ClientId, DocumentId, EmailAddress, Sha256Digest};
pub use records::{
    ChatMessage, ChatRole, Record, RecordKind, Report, UploadRecord, UploadRecordBuilder,
    UserProgress,
};
pub use result::Result;
