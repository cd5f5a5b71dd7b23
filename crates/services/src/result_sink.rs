use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::error::DeliveryError;

/// Everything a sink needs to deliver one finalized result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultPayload {
    pub student_name: String,
    pub registration_number: String,
    pub contact_email: String,
    pub score: u32,
    pub total_questions: u32,
    /// Admin notification address, resolved from stored settings.
    pub destination_address: String,
}

/// A collaborator responsible for transmitting a finalized result outside
/// the app, typically by emailing the admin.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Deliver the payload to its destination.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError` when the result could not be transmitted.
    /// Delivery failures are recoverable; the caller may retry.
    async fn deliver(&self, payload: &ResultPayload) -> Result<(), DeliveryError>;
}

#[derive(Clone, Debug)]
pub struct MailApiConfig {
    pub base_url: String,
    pub api_key: String,
}

impl MailApiConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("QUIZ_MAIL_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("QUIZ_MAIL_BASE_URL").unwrap_or_else(|_| "https://api.mailer.dev".into());
        Some(Self { base_url, api_key })
    }
}

/// `ResultSink` backed by a JSON mail API.
#[derive(Clone)]
pub struct MailApiSink {
    client: Client,
    config: Option<MailApiConfig>,
}

impl MailApiSink {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(MailApiConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<MailApiConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl ResultSink for MailApiSink {
    async fn deliver(&self, payload: &ResultPayload) -> Result<(), DeliveryError> {
        let config = self.config.as_ref().ok_or(DeliveryError::Disabled)?;

        let url = format!("{}/messages", config.base_url.trim_end_matches('/'));
        let message = MailMessage {
            to: &payload.destination_address,
            subject: format!("Quiz result: {}", payload.student_name),
            text: format!(
                "{} ({}) scored {}/{}. Contact: {}",
                payload.student_name,
                payload.registration_number,
                payload.score,
                payload.total_questions,
                payload.contact_email,
            ),
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&message)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DeliveryError::HttpStatus(response.status()));
        }

        tracing::info!(to = %payload.destination_address, "result email delivered");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct MailMessage<'a> {
    to: &'a str,
    subject: String,
    text: String,
}
