//! In-process mailer for tests and local runs

use crate::adapters::mail::{Mailer, OperatorNotification};
use crate::domain::DeliveryError;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Mailer that records notifications instead of sending them
///
/// When built with [`MockMailer::failing`], every send is rejected and nothing
/// is recorded.
#[derive(Debug, Default)]
pub struct MockMailer {
    sent: Mutex<Vec<OperatorNotification>>,
    fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose relay rejects everything
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    /// Notifications accepted so far
    pub async fn sent(&self) -> Vec<OperatorNotification> {
        self.sent.lock().await.clone()
    }

    /// Number of notifications accepted so far
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, notification: &OperatorNotification) -> Result<(), DeliveryError> {
        if self.fail {
            return Err(DeliveryError::Rejected("535 authentication failed".to_string()));
        }
        self.sent.lock().await.push(notification.clone());
        Ok(())
    }
}
