//! The seam between the dispatcher and a transactional email service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::email::EmailAddress;

/// A single message ready to hand to an [EmailProvider].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingEmail {
    /// The sender identity, e.g. "Finance App <onboarding@resend.dev>".
    pub from: String,
    /// The single address the message is delivered to.
    pub to: EmailAddress,
    /// The subject line.
    pub subject: String,
    /// The rendered HTML body.
    pub html: String,
}

/// The provider's response to a single send.
///
/// Fields other than `id` are kept in `extra` so the response serializes back
/// to exactly what the provider sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentEmail {
    /// Provider-specific message ID for tracking.
    pub id: String,
    /// Any other fields in the provider's response.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SentEmail {
    /// A response carrying only the message ID.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            extra: Map::new(),
        }
    }
}

/// The provider's response to a batch send, one entry per accepted message.
///
/// Fields other than `data`, e.g. Resend's per-message `errors` in permissive
/// mode, are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResponse {
    /// The sent messages, in request order.
    pub data: Vec<SentEmail>,
    /// Any other fields in the provider's response.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BatchResponse {
    /// A response carrying only the sent messages.
    pub fn new(data: Vec<SentEmail>) -> Self {
        Self {
            data,
            extra: Map::new(),
        }
    }
}

/// Errors reported by an [EmailProvider].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// The request never got a response, e.g. a DNS failure or a timeout.
    #[error("NetworkError: {0}")]
    Network(String),

    /// The provider answered with a non-success status code.
    #[error("{name}: {message} (status {status})")]
    Rejected {
        status: u16,
        name: String,
        message: String,
    },

    /// The provider answered with a success status but the body could not be
    /// read.
    #[error("InvalidResponse: {0}")]
    InvalidResponse(String),
}

/// A transactional email service offering single and batch sends.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send one message.
    async fn send(&self, email: &OutgoingEmail) -> Result<SentEmail, ProviderError>;

    /// Send several independent messages in one request.
    async fn send_batch(&self, emails: &[OutgoingEmail]) -> Result<BatchResponse, ProviderError>;

    /// The provider name for logging.
    fn name(&self) -> &'static str;
}
