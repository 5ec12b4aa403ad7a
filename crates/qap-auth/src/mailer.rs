//! Delivery of first-access tokens.
//!
//! The raw token leaves the authority only through a [`VerificationMailer`].

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use qap_core::config::AuthConfig;
use qap_core::error::AppError;
use qap_core::result::AppResult;
use qap_core::traits::clock::Clock;
use qap_store::StoreManager;
use qap_store::keys;

/// Sends first-access tokens to account owners.
#[async_trait]
pub trait VerificationMailer: Send + Sync + std::fmt::Debug + 'static {
    /// Deliver a first-access token to `email`.
    async fn deliver_first_access(&self, email: &str, token: &str) -> AppResult<()>;
}

/// One delivered first-access message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboxMessage {
    /// Recipient.
    pub email: String,
    /// Raw token.
    pub token: String,
    /// When the message was handed over.
    pub sent_at: DateTime<Utc>,
}

/// Keeps delivered messages in memory. Used in tests and development.
#[derive(Debug, Default)]
pub struct OutboxMailer {
    messages: Mutex<Vec<OutboxMessage>>,
}

impl OutboxMailer {
    /// Create an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of every delivered message, oldest first.
    pub fn messages(&self) -> Vec<OutboxMessage> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Most recent token delivered to `email`.
    pub fn last_token_for(&self, email: &str) -> Option<String> {
        self.messages()
            .into_iter()
            .rev()
            .find(|message| message.email == email)
            .map(|message| message.token)
    }
}

#[async_trait]
impl VerificationMailer for OutboxMailer {
    async fn deliver_first_access(&self, email: &str, token: &str) -> AppResult<()> {
        let message = OutboxMessage {
            email: email.to_string(),
            token: token.to_string(),
            sent_at: Utc::now(),
        };
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message);
        Ok(())
    }
}

/// Persists the latest first-access message per email in the store, where
/// the email-delivery process picks it up.
#[derive(Debug, Clone)]
pub struct StoreOutboxMailer {
    store: Arc<StoreManager>,
    clock: Arc<dyn Clock>,
}

impl StoreOutboxMailer {
    /// Create an outbox over `store`.
    pub fn new(store: Arc<StoreManager>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Every message waiting in the outbox, ordered by recipient.
    pub async fn messages(&self) -> AppResult<Vec<OutboxMessage>> {
        self.store.scan_json(&keys::outbox_prefix()).await
    }

    /// Most recent token delivered to `email`.
    pub async fn last_token_for(&self, email: &str) -> AppResult<Option<String>> {
        let message: Option<OutboxMessage> = self.store.get_json(&keys::outbox(email)).await?;
        Ok(message.map(|message| message.token))
    }
}

#[async_trait]
impl VerificationMailer for StoreOutboxMailer {
    async fn deliver_first_access(&self, email: &str, token: &str) -> AppResult<()> {
        let message = OutboxMessage {
            email: email.to_string(),
            token: token.to_string(),
            sent_at: self.clock.now(),
        };
        self.store.set_json(&keys::outbox(email), &message).await?;
        info!(email = %email, "First-access token queued in outbox");
        Ok(())
    }
}

/// Logs that a delivery happened. The token itself is never logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl VerificationMailer for LogMailer {
    async fn deliver_first_access(&self, email: &str, _token: &str) -> AppResult<()> {
        info!(email = %email, "First-access token issued");
        Ok(())
    }
}

/// Build the delivery channel selected by `auth.mailer`.
pub fn from_config(
    config: &AuthConfig,
    store: Arc<StoreManager>,
    clock: Arc<dyn Clock>,
) -> AppResult<Arc<dyn VerificationMailer>> {
    match config.mailer.as_str() {
        "outbox" => {
            info!("First-access tokens go to the store outbox");
            Ok(Arc::new(StoreOutboxMailer::new(store, clock)))
        }
        "log" => {
            info!("First-access tokens are logged only");
            Ok(Arc::new(LogMailer))
        }
        other => Err(AppError::configuration(format!(
            "Unknown mailer: '{other}'. Supported: outbox, log"
        ))),
    }
}
