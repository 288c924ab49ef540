//! Engagement ledger
//!
//! Credits clients for uploads. Each client has exactly one progress record;
//! the first credit creates it and later credits increment it in place through
//! the store's atomic upsert, so concurrent uploads never lose points.

use crate::adapters::database::{find_record, DocumentStore, Filter, Mutation, UpsertOutcome};
use crate::domain::ids::ClientId;
use crate::domain::records::{Record, UserProgress};
use crate::domain::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Points credited for every recorded upload
pub const UPLOAD_REWARD_POINTS: u64 = 10;

/// A client's standing as reported to callers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressView {
    pub points: u64,
    pub uploads_count: u64,
    pub badges: Vec<String>,
}

impl From<UserProgress> for ProgressView {
    fn from(progress: UserProgress) -> Self {
        Self {
            points: progress.points,
            uploads_count: progress.uploads_count,
            badges: progress.badges,
        }
    }
}

/// Per-client points and upload counts
#[derive(Clone)]
pub struct EngagementLedger {
    store: Arc<dyn DocumentStore>,
}

impl EngagementLedger {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Credit one upload to `client_id`
    ///
    /// Adds [`UPLOAD_REWARD_POINTS`] points and one upload, creating the
    /// progress record on the client's first upload.
    ///
    /// # Errors
    ///
    /// Returns `NovaError::Configuration` when no store is available, or a
    /// store error if the upsert fails.
    pub async fn award_upload(&self, client_id: &ClientId) -> Result<UpsertOutcome> {
        let filter = Filter::eq("client_id", client_id.as_str());
        let mutation = Mutation::new()
            .inc("points", UPLOAD_REWARD_POINTS as i64)
            .inc("uploads_count", 1);

        let first = UserProgress {
            points: UPLOAD_REWARD_POINTS,
            uploads_count: 1,
            ..UserProgress::empty(client_id.clone())
        };
        let on_insert = serde_json::to_value(&first)?;

        let outcome = self
            .store
            .upsert(UserProgress::KIND, &filter, &mutation, on_insert)
            .await?;

        tracing::debug!(
            client_id = %client_id,
            created = matches!(outcome, UpsertOutcome::Inserted(_)),
            points = UPLOAD_REWARD_POINTS,
            "Upload credited to engagement ledger"
        );

        Ok(outcome)
    }

    /// Current standing of `client_id`, zeroed when the client is unknown
    pub async fn progress(&self, client_id: &ClientId) -> Result<ProgressView> {
        let filter = Filter::eq("client_id", client_id.as_str());
        let stored = find_record::<UserProgress>(self.store.as_ref(), &filter).await?;

        Ok(stored
            .map(|stored| ProgressView::from(stored.record))
            .unwrap_or_default())
    }
}
