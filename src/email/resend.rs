//! Resend email provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::email::{BatchResponse, EmailProvider, OutgoingEmail, ProviderError, SentEmail};

/// The production Resend API.
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";

/// How long to wait for Resend to answer before giving up on a request.
pub const DEFAULT_RESEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Resend API configuration.
#[derive(Debug, Clone)]
pub struct ResendConfig {
    /// Resend API key, e.g. "re_123...".
    pub api_key: String,
    /// Resend API base URL, without a trailing slash.
    pub api_url: String,
    /// The limit on each request, after which it fails with a network error.
    pub timeout: Duration,
}

impl ResendConfig {
    /// Create a configuration that talks to the production Resend API.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_owned(),
            api_url: DEFAULT_RESEND_API_URL.to_owned(),
            timeout: DEFAULT_RESEND_TIMEOUT,
        }
    }

    /// Use a different API base URL, e.g. a local mock server.
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_owned();
        self
    }

    /// Use a different per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Sends email through the Resend HTTP API.
#[derive(Debug, Clone)]
pub struct ResendProvider {
    config: ResendConfig,
    client: Client,
}

impl ResendProvider {
    pub fn new(config: ResendConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    async fn post<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<Response, ProviderError> {
        let response = self
            .client
            .post(format!("{}{endpoint}", self.config.api_url))
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .json(body)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        let (name, message) = match serde_json::from_str::<ResendErrorBody>(&error_body) {
            Ok(error) => (error.name, error.message),
            Err(_) => ("application_error".to_owned(), error_body),
        };

        Err(ProviderError::Rejected {
            status: status.as_u16(),
            name,
            message,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ResendErrorBody {
    name: String,
    message: String,
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ProviderError::InvalidResponse(error.to_string())
        } else {
            ProviderError::Network(error.to_string())
        }
    }
}

#[async_trait]
impl EmailProvider for ResendProvider {
    async fn send(&self, email: &OutgoingEmail) -> Result<SentEmail, ProviderError> {
        tracing::debug!(to = %email.to, subject = %email.subject, "sending email via Resend");

        let response = self.post("/emails", email).await?;

        Ok(response.json::<SentEmail>().await?)
    }

    async fn send_batch(&self, emails: &[OutgoingEmail]) -> Result<BatchResponse, ProviderError> {
        tracing::debug!(count = emails.len(), "sending email batch via Resend");

        let response = self.post("/emails/batch", emails).await?;

        Ok(response.json::<BatchResponse>().await?)
    }

    fn name(&self) -> &'static str {
        "Resend"
    }
}
