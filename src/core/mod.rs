//! Core business logic for Nova Intake.
//!
//! # Modules
//!
//! - [`digest`] - SHA-256 over uploaded content
//! - [`intake`] - Upload metadata recording
//! - [`ledger`] - Per-client engagement points
//! - [`dispatch`] - Report storage and operator notification
//! - [`assistant`] - Keyword help responder
//!
//! # Upload Workflow
//!
//! 1. **Digest**: hash the upload body as it streams in
//! 2. **Record**: create the upload metadata record
//! 3. **Credit**: upsert the client's progress record
//!
//! Every service takes the shared `Arc<dyn DocumentStore>` at construction, so
//! tests run the same code against the in-memory store.

pub mod assistant;
pub mod digest;
pub mod dispatch;
pub mod intake;
pub mod ledger;

pub use digest::{digest_source, ContentDigest, StreamingDigest};
pub use dispatch::{DispatchOutcome, ReportDispatcher, ReportSubmission};
pub use intake::{IncomingUpload, UploadReceipt, UploadService};
pub use ledger::{EngagementLedger, ProgressView, UPLOAD_REWARD_POINTS};
