//! SMTP delivery through an authenticated STARTTLS relay

use crate::adapters::mail::{Mailer, OperatorNotification};
use crate::config::schema::NotificationConfig;
use crate::domain::DeliveryError;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Mailer backed by lettre's async SMTP transport
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpMailer {
    /// Build a mailer from the notification settings
    ///
    /// # Returns
    ///
    /// `Ok(None)` when host, user or password is missing; delivery is then
    /// skipped entirely.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::ConnectionFailed` if the relay TLS parameters
    /// cannot be built for the host.
    pub fn from_config(config: &NotificationConfig) -> Result<Option<Self>, DeliveryError> {
        if !config.credentials_configured() {
            return Ok(None);
        }

        let (Some(host), Some(user), Some(password)) = (
            config.smtp_host.as_deref(),
            config.smtp_user.as_deref(),
            config.smtp_password.as_ref(),
        ) else {
            return Ok(None);
        };

        let credentials = Credentials::new(
            user.to_string(),
            password.expose_secret().as_ref().to_string(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| DeliveryError::ConnectionFailed(format!("SMTP relay error: {e}")))?
            .port(config.smtp_port)
            .credentials(credentials)
            .timeout(Some(Duration::from_secs(config.timeout_seconds)))
            .build();

        Ok(Some(Self {
            transport,
            host: host.to_string(),
        }))
    }

    /// Relay host this mailer sends through
    pub fn host(&self) -> &str {
        &self.host
    }
}

/// Assemble the plain-text message for `notification`
pub fn build_message(notification: &OperatorNotification) -> Result<Message, DeliveryError> {
    let from: Mailbox = notification
        .from
        .parse()
        .map_err(|e| DeliveryError::InvalidAddress(format!("Invalid from address: {e}")))?;
    let to: Mailbox = notification
        .to
        .as_str()
        .parse()
        .map_err(|e| DeliveryError::InvalidAddress(format!("Invalid to address: {e}")))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(notification.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(notification.body.clone())
        .map_err(|e| DeliveryError::MessageBuild(e.to_string()))
}

fn classify(err: lettre::transport::smtp::Error) -> DeliveryError {
    if err.is_timeout() {
        DeliveryError::Timeout(err.to_string())
    } else if err.is_permanent() || err.is_transient() {
        DeliveryError::Rejected(err.to_string())
    } else {
        DeliveryError::ConnectionFailed(err.to_string())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, notification: &OperatorNotification) -> Result<(), DeliveryError> {
        let message = build_message(notification)?;

        self.transport.send(message).await.map_err(classify)?;

        tracing::debug!(relay = %self.host, to = %notification.to, "Notification accepted by relay");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::domain::ids::EmailAddress;

    fn notification(from: &str) -> OperatorNotification {
        OperatorNotification {
            to: EmailAddress::new("owner@example.com").unwrap(),
            from: from.to_string(),
            subject: "Nova Enterprises Report: hello".to_string(),
            body: "Client: c1\nFrom: a@b.com\n\nhi".to_string(),
        }
    }

    #[test]
    fn test_missing_credentials_yield_no_mailer() {
        let config = NotificationConfig {
            smtp_host: Some("smtp.example.com".to_string()),
            ..Default::default()
        };
        assert!(SmtpMailer::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_full_credentials_yield_mailer() {
        let config = NotificationConfig {
            smtp_host: Some("smtp.example.com".to_string()),
            smtp_user: Some("relay@example.com".to_string()),
            smtp_password: Some(secret_string("pw".to_string())),
            ..Default::default()
        };
        let mailer = SmtpMailer::from_config(&config).unwrap().unwrap();
        assert_eq!(mailer.host(), "smtp.example.com");
    }

    #[test]
    fn test_build_message() {
        let message = build_message(&notification("relay@example.com")).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("Subject: Nova Enterprises Report: hello"));
        assert!(formatted.contains("To: owner@example.com"));
    }

    #[test]
    fn test_build_message_rejects_bad_sender() {
        let result = build_message(&notification("not an address"));
        assert!(matches!(result, Err(DeliveryError::InvalidAddress(_))));
    }
}
