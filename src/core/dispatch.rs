//! Report dispatch
//!
//! Stores support reports and makes a single best-effort attempt to notify the
//! operator. Delivery failures never fail the submission; they are recorded
//! by leaving `sent_to_owner` false.

use crate::adapters::database::{create_record, DocumentStore, Filter, Mutation};
use crate::adapters::mail::{Mailer, OperatorNotification, SmtpMailer};
use crate::config::schema::NotificationConfig;
use crate::domain::ids::{ClientId, DocumentId, EmailAddress};
use crate::domain::records::{Record, Report};
use crate::domain::{NovaError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Subject prefix of operator notifications
pub const SUBJECT_PREFIX: &str = "Nova Enterprises Report: ";

/// Placeholder rendered for absent optional fields in the notification body
const NOT_PROVIDED: &str = "(none)";

/// A report as submitted by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSubmission {
    pub client_id: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub from_email: Option<String>,
}

/// Result of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Identifier of the stored report
    pub id: DocumentId,
    /// Whether the operator notification was accepted by the relay
    pub sent: bool,
    /// Operator address the notification was addressed to
    pub owner: EmailAddress,
}

struct Delivery {
    mailer: Arc<dyn Mailer>,
    sender: String,
}

/// Persists reports and notifies the operator
#[derive(Clone)]
pub struct ReportDispatcher {
    store: Arc<dyn DocumentStore>,
    owner: EmailAddress,
    delivery: Option<Arc<Delivery>>,
}

impl ReportDispatcher {
    /// Dispatcher that stores reports without ever attempting delivery
    pub fn new(store: Arc<dyn DocumentStore>, owner: EmailAddress) -> Self {
        Self {
            store,
            owner,
            delivery: None,
        }
    }

    /// Attempt delivery through `mailer`, sending as `sender`
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>, sender: impl Into<String>) -> Self {
        self.delivery = Some(Arc::new(Delivery {
            mailer,
            sender: sender.into(),
        }));
        self
    }

    /// Build a dispatcher from the notification settings
    ///
    /// An SMTP mailer is attached only when host, user and password are all
    /// configured. A relay that cannot be set up is logged and treated as
    /// unconfigured.
    ///
    /// # Errors
    ///
    /// Returns `NovaError::Configuration` if the owner or sender address is
    /// invalid.
    pub fn from_config(store: Arc<dyn DocumentStore>, config: &NotificationConfig) -> Result<Self> {
        let owner = EmailAddress::new(config.owner_email.as_str())
            .map_err(|e| NovaError::Configuration(format!("notification.owner_email: {e}")))?;
        let sender = config.sender_address().map_err(NovaError::Configuration)?;
        let dispatcher = Self::new(store, owner);

        match SmtpMailer::from_config(config) {
            Ok(Some(mailer)) => {
                tracing::info!(relay = %mailer.host(), sender = %sender, "Operator notifications enabled");
                Ok(dispatcher.with_mailer(Arc::new(mailer), sender.to_string()))
            }
            Ok(None) => {
                tracing::info!("SMTP credentials not configured; reports will be stored only");
                Ok(dispatcher)
            }
            Err(e) => {
                tracing::warn!(error = %e, "SMTP relay unusable; reports will be stored only");
                Ok(dispatcher)
            }
        }
    }

    /// Operator address
    pub fn owner(&self) -> &EmailAddress {
        &self.owner
    }

    /// Whether delivery will be attempted
    pub fn delivery_enabled(&self) -> bool {
        self.delivery.is_some()
    }

    /// Validate, store, and try to deliver a report
    ///
    /// # Errors
    ///
    /// Returns `NovaError::Validation` for an empty subject or malformed
    /// `from_email`, and the store's error if the report cannot be persisted.
    /// Delivery problems are never returned.
    pub async fn submit(&self, submission: ReportSubmission) -> Result<DispatchOutcome> {
        let report = Self::validate(submission)?;

        let id = create_record(self.store.as_ref(), &report).await?;
        tracing::info!(
            id = %id,
            client_id = report.client_id.as_ref().map(ClientId::as_str).unwrap_or(NOT_PROVIDED),
            subject = %report.subject,
            "Report stored"
        );

        let sent = match self.delivery.as_deref() {
            Some(delivery) => self.deliver(delivery, id, &report).await,
            None => false,
        };

        Ok(DispatchOutcome {
            id,
            sent,
            owner: self.owner.clone(),
        })
    }

    fn validate(submission: ReportSubmission) -> Result<Report> {
        let subject = submission.subject.trim();
        if subject.is_empty() {
            return Err(NovaError::Validation("subject cannot be empty".to_string()));
        }

        let client_id = ClientId::new(submission.client_id).ok();

        let from_email = submission
            .from_email
            .filter(|email| !email.trim().is_empty())
            .map(EmailAddress::new)
            .transpose()
            .map_err(NovaError::Validation)?;

        Ok(Report::new(client_id, subject, submission.message, from_email))
    }

    /// One delivery attempt; returns whether the relay accepted the message
    ///
    /// Acceptance is reported even when the stored report cannot be marked
    /// afterwards.
    async fn deliver(&self, delivery: &Delivery, id: DocumentId, report: &Report) -> bool {
        let notification = self.notification(&delivery.sender, report);

        if let Err(e) = delivery.mailer.send(&notification).await {
            tracing::warn!(id = %id, error = %e, "Operator notification failed");
            return false;
        }

        let mark = Mutation::new().set("sent_to_owner", true);
        match self.store.update(Report::KIND, &Filter::by_id(id), &mark).await {
            Ok(matched) if matched > 0 => {
                tracing::info!(id = %id, owner = %self.owner, "Operator notified");
            }
            Ok(_) => {
                tracing::warn!(id = %id, "Operator notified but report no longer exists");
            }
            Err(e) => {
                tracing::error!(id = %id, error = %e, "Operator notified but report could not be marked");
            }
        }

        true
    }

    fn notification(&self, sender: &str, report: &Report) -> OperatorNotification {
        let client = report
            .client_id
            .as_ref()
            .map(ClientId::as_str)
            .unwrap_or(NOT_PROVIDED);
        let from = report
            .from_email
            .as_ref()
            .map(EmailAddress::as_str)
            .unwrap_or(NOT_PROVIDED);

        OperatorNotification {
            to: self.owner.clone(),
            from: sender.to_string(),
            subject: format!("{SUBJECT_PREFIX}{}", report.subject),
            body: format!("Client: {client}\nFrom: {from}\n\n{}", report.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::database::{find_record, UpsertOutcome};
    use crate::adapters::mail::smtp::build_message;
    use crate::adapters::mail::MockMailer;
    use crate::adapters::memory::MemoryStore;
    use crate::config::schema::DEFAULT_OWNER_EMAIL;
    use crate::config::secret_string;
    use crate::domain::records::RecordKind;
    use async_trait::async_trait;
    use serde_json::Value;

    fn submission(subject: &str, from_email: Option<&str>) -> ReportSubmission {
        ReportSubmission {
            client_id: "c1".to_string(),
            subject: subject.to_string(),
            message: "the scanner flagged my file".to_string(),
            from_email: from_email.map(str::to_string),
        }
    }

    fn owner() -> EmailAddress {
        EmailAddress::new(DEFAULT_OWNER_EMAIL).unwrap()
    }

    async fn stored(store: &MemoryStore, id: DocumentId) -> Report {
        find_record::<Report>(store, &Filter::by_id(id))
            .await
            .unwrap()
            .unwrap()
            .record
    }

    #[tokio::test]
    async fn test_without_mailer_report_is_stored_unsent() {
        let store = Arc::new(MemoryStore::new());
        let dispatcher = ReportDispatcher::new(store.clone(), owner());

        let outcome = dispatcher
            .submit(submission("help", Some("user@example.com")))
            .await
            .unwrap();

        assert!(!outcome.sent);
        assert_eq!(outcome.owner.as_str(), DEFAULT_OWNER_EMAIL);

        let report = stored(&store, outcome.id).await;
        assert!(!report.sent_to_owner);
        assert!(report.created_at.is_some());
    }

    #[tokio::test]
    async fn test_successful_delivery_marks_that_report() {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(MockMailer::new());
        let dispatcher = ReportDispatcher::new(store.clone(), owner())
            .with_mailer(mailer.clone(), "relay@example.com");

        let earlier = ReportDispatcher::new(store.clone(), owner())
            .submit(submission("help", None))
            .await
            .unwrap();
        let outcome = dispatcher.submit(submission("help", None)).await.unwrap();

        assert!(outcome.sent);
        assert!(stored(&store, outcome.id).await.sent_to_owner);
        assert!(!stored(&store, earlier.id).await.sent_to_owner);

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Nova Enterprises Report: help");
        assert_eq!(sent[0].from, "relay@example.com");
        assert_eq!(
            sent[0].body,
            "Client: c1\nFrom: (none)\n\nthe scanner flagged my file"
        );
    }

    #[tokio::test]
    async fn test_failed_delivery_is_recovered() {
        let store = Arc::new(MemoryStore::new());
        let dispatcher = ReportDispatcher::new(store.clone(), owner())
            .with_mailer(Arc::new(MockMailer::failing()), "relay@example.com");

        let outcome = dispatcher.submit(submission("help", None)).await.unwrap();

        assert!(!outcome.sent);
        assert!(!stored(&store, outcome.id).await.sent_to_owner);
    }

    #[tokio::test]
    async fn test_validation_happens_before_persistence() {
        let store = Arc::new(MemoryStore::new());
        let dispatcher = ReportDispatcher::new(store.clone(), owner());

        let empty_subject = dispatcher.submit(submission("   ", None)).await;
        assert!(matches!(empty_subject, Err(NovaError::Validation(_))));

        let bad_email = dispatcher.submit(submission("help", Some("not-an-email"))).await;
        assert!(matches!(bad_email, Err(NovaError::Validation(_))));

        assert_eq!(store.count(RecordKind::Report).await, 0);
    }

    #[tokio::test]
    async fn test_from_config_without_credentials_disables_delivery() {
        let dispatcher =
            ReportDispatcher::from_config(Arc::new(MemoryStore::new()), &NotificationConfig::default())
                .unwrap();
        assert!(!dispatcher.delivery_enabled());
    }

    #[tokio::test]
    async fn test_from_config_with_non_address_relay_user() {
        let config = NotificationConfig {
            smtp_host: Some("smtp.sendgrid.net".to_string()),
            smtp_user: Some("apikey".to_string()),
            smtp_password: Some(secret_string("SG.key".to_string())),
            ..Default::default()
        };
        let dispatcher = ReportDispatcher::from_config(Arc::new(MemoryStore::new()), &config).unwrap();

        let delivery = dispatcher.delivery.as_deref().unwrap();
        assert_eq!(delivery.sender, DEFAULT_OWNER_EMAIL);

        let report = Report::new(None, "help", "body", None);
        let notification = dispatcher.notification(&delivery.sender, &report);
        assert!(build_message(&notification).is_ok());
    }

    /// Memory store whose updates always fail
    struct UnmarkableStore(MemoryStore);

    #[async_trait]
    impl DocumentStore for UnmarkableStore {
        async fn test_connection(&self) -> Result<()> {
            self.0.test_connection().await
        }

        async fn ensure_schema(&self) -> Result<()> {
            self.0.ensure_schema().await
        }

        async fn create(&self, kind: RecordKind, document: Value) -> Result<DocumentId> {
            self.0.create(kind, document).await
        }

        async fn find_one(
            &self,
            kind: RecordKind,
            filter: &Filter,
        ) -> Result<Option<Value>> {
            self.0.find_one(kind, filter).await
        }

        async fn find_recent(
            &self,
            kind: RecordKind,
            filter: &Filter,
            limit: usize,
        ) -> Result<Vec<Value>> {
            self.0.find_recent(kind, filter, limit).await
        }

        async fn update(&self, _kind: RecordKind, _filter: &Filter, _mutation: &Mutation) -> Result<u64> {
            Err(NovaError::Other("update rejected".to_string()))
        }

        async fn upsert(
            &self,
            kind: RecordKind,
            filter: &Filter,
            mutation: &Mutation,
            on_insert: Value,
        ) -> Result<UpsertOutcome> {
            self.0.upsert(kind, filter, mutation, on_insert).await
        }

        async fn list_collections(&self) -> Result<Vec<String>> {
            self.0.list_collections().await
        }

        fn database_name(&self) -> &str {
            self.0.database_name()
        }
    }

    #[tokio::test]
    async fn test_delivery_reported_when_mark_fails() {
        let store = Arc::new(UnmarkableStore(MemoryStore::new()));
        let mailer = Arc::new(MockMailer::new());
        let dispatcher = ReportDispatcher::new(store.clone(), owner())
            .with_mailer(mailer.clone(), "relay@example.com");

        let outcome = dispatcher.submit(submission("help", None)).await.unwrap();

        assert!(outcome.sent);
        assert_eq!(mailer.sent().await.len(), 1);
        assert!(!stored(&store.0, outcome.id).await.sent_to_owner);
    }
}
