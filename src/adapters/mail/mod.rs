//! Operator notification delivery
//!
//! This module abstracts outbound mail behind the [`Mailer`] trait so the
//! report dispatcher can be exercised without a relay.

pub mod mock;
pub mod smtp;

use crate::domain::ids::EmailAddress;
use crate::domain::DeliveryError;
use async_trait::async_trait;

pub use mock::MockMailer;
pub use smtp::SmtpMailer;

/// A plain-text message to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorNotification {
    /// Recipient
    pub to: EmailAddress,

    /// Sender, normally the relay account
    pub from: String,

    /// Subject line
    pub subject: String,

    /// Plain-text body
    pub body: String,
}

/// Outbound mail transport
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one notification
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] if the message cannot be built or the relay
    /// does not accept it. Callers decide whether that is fatal.
    async fn send(&self, notification: &OperatorNotification) -> Result<(), DeliveryError>;
}
