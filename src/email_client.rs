//! Client for the transactional-email provider's HTTP API.
//!
//! One client is built per process from [`EmailClientSettings`] and shared
//! read-only across requests. Provider failures never escape as errors:
//! every send collapses into a [`DeliveryResult`] value.

use crate::{
    configuration::EmailClientSettings,
    domain::{EmailAddress, EmailMessage},
};
use http::StatusCode;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

/// Maximum number of attempts for a single message, first try included.
const MAX_SEND_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug)]
pub struct EmailClient {
    send_url: Url,
    sender: EmailAddress,
    http_client: Client,
    authorization_token: Secret<String>,
}

impl EmailClient {
    /// Create a new email client. The send endpoint is derived from the base
    /// url here, so a base url that cannot carry a path is rejected at
    /// startup rather than at send time.
    pub fn new(
        base_url: Url,
        sender: EmailAddress,
        authorization_token: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, EmailClientError> {
        Ok(Self {
            send_url: base_url.join("v3/smtp/email")?,
            sender,
            http_client: Client::builder().timeout(timeout).build()?,
            authorization_token,
        })
    }

    /// Send one HTML email to one recipient.
    ///
    /// Transient failures (network errors, provider 5xx, rate limiting) are
    /// retried with exponential backoff up to [`MAX_SEND_ATTEMPTS`]; anything
    /// else is terminal on the first attempt. The outcome is always returned
    /// as a value, never as an error.
    pub async fn send_email(&self, message: &EmailMessage) -> DeliveryResult {
        let mut attempt = 1;
        loop {
            match self.try_send(message).await {
                Ok(message_id) => return DeliveryResult::Sent { message_id },
                Err(error) if attempt < MAX_SEND_ATTEMPTS && error.is_retryable() => {
                    tracing::warn!(%error, attempt, "Transient failure from email provider, retrying");
                    tokio::time::sleep(RETRY_BASE_DELAY * 2u32.pow(attempt - 1)).await;
                    attempt += 1;
                }
                Err(error) => {
                    tracing::error!(%error, attempt, "Giving up on email delivery");
                    return DeliveryResult::Failed {
                        error: error.to_string(),
                    };
                }
            }
        }
    }

    async fn try_send(&self, message: &EmailMessage) -> Result<String, SendEmailError> {
        let request_body = SendEmailRequest {
            sender: EmailRecipient {
                email: self.sender.as_ref(),
                name: None,
            },
            to: vec![EmailRecipient {
                email: message.recipient(),
                name: message.recipient_name().as_deref(),
            }],
            subject: message.subject(),
            html_content: message.html_body(),
        };

        let response = self
            .http_client
            .post(self.send_url.clone())
            .header("api-key", self.authorization_token.expose_secret())
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SendEmailError::Provider {
                status: response.status(),
            });
        }

        let body: SendEmailResponse = response.json().await?;
        Ok(body.message_id)
    }
}

impl TryFrom<&EmailClientSettings> for EmailClient {
    type Error = String;

    fn try_from(config: &EmailClientSettings) -> Result<Self, Self::Error> {
        Self::new(
            config.base_url().map_err(|e| {
                tracing::error!("Unable to parse email client's base url: {e}");
                "Email base url is invalid".to_string()
            })?,
            config.sender()?,
            config.authorization_token().clone(),
            config.timeout(),
        )
        .map_err(|e| {
            tracing::error!("Unable to build the email client: {e}");
            "Email client could not be constructed".to_string()
        })
    }
}

/// Normalized outcome of a send, reported back to the caller as a value.
#[derive(Debug)]
pub enum DeliveryResult {
    Sent { message_id: String },
    Failed { error: String },
}

/// Represent the ways constructing an [`EmailClient`] can fail.
#[derive(Debug, thiserror::Error)]
pub enum EmailClientError {
    #[error("The send endpoint could not be derived from the base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("The underlying HTTP client could not be constructed: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Debug, thiserror::Error)]
enum SendEmailError {
    #[error("Failed to reach the email provider: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Email provider rejected the request with status {status}")]
    Provider { status: StatusCode },
}

impl SendEmailError {
    fn is_retryable(&self) -> bool {
        match self {
            // A 2xx response with an undecodable body is not resent: the
            // provider may already have accepted the message.
            Self::Transport(error) => !error.is_decode(),
            Self::Provider { status } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    sender: EmailRecipient<'a>,
    to: Vec<EmailRecipient<'a>>,
    subject: &'a str,
    html_content: &'a str,
}

#[derive(Debug, serde::Serialize)]
struct EmailRecipient<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailResponse {
    message_id: String,
}
