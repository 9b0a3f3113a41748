//! Sends transactional email and normalises the outcome.

use std::{fmt::Debug, sync::Arc};

use serde::Serialize;

use crate::email::{
    BatchResponse, EmailAddress, EmailProvider, OutgoingEmail, ProviderError, Recipient,
    ResendConfig, ResendProvider, SentEmail,
};

/// The sender identity used when none is configured.
pub const DEFAULT_SENDER: &str = "Finance App <onboarding@resend.dev>";

/// The provider's payload for a successful dispatch, returned unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DispatchData {
    /// The response to a single send.
    Single(SentEmail),
    /// The response to a batch send.
    Batch(BatchResponse),
}

/// Why a dispatch failed.
///
/// A failed batch is reported once for the whole batch, not per recipient.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    /// A [Recipient::Many] with an empty list was given.
    #[error("InvalidInput: at least one recipient is required")]
    NoRecipients,

    /// The provider could not be reached or rejected the request.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// The result of a single call to [EmailDispatcher::send].
pub type DispatchResult = Result<DispatchData, DispatchError>;

/// The uniform shape of a dispatch result for display to the user.
///
/// Serializes to `{"success": true, "data": ...}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchOutcome {
    /// Whether the provider accepted the email.
    pub success: bool,
    /// The provider's response, set on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<DispatchData>,
    /// The textual cause of the failure, set on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<DispatchResult> for DispatchOutcome {
    fn from(result: DispatchResult) -> Self {
        match result {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(error) => Self {
                success: false,
                data: None,
                error: Some(error.to_string()),
            },
        }
    }
}

/// Sends email from a fixed sender identity through an [EmailProvider].
///
/// The dispatcher holds no mutable state, so clones can be used from many
/// tasks at once. Concurrent sends are independent and may complete in any
/// order.
#[derive(Clone)]
pub struct EmailDispatcher {
    provider: Arc<dyn EmailProvider>,
    sender: String,
}

impl EmailDispatcher {
    /// Create a dispatcher that sends as `sender` through `provider`.
    pub fn new(provider: Arc<dyn EmailProvider>, sender: &str) -> Self {
        Self {
            provider,
            sender: sender.to_owned(),
        }
    }

    /// Create a dispatcher backed by the Resend API.
    pub fn resend(config: ResendConfig, sender: &str) -> Self {
        Self::new(Arc::new(ResendProvider::new(config)), sender)
    }

    /// The sender identity placed on every message.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Send `content` (rendered HTML) with `subject` to `recipient`.
    ///
    /// A [Recipient::Single] is sent with one single-send request. A
    /// [Recipient::Many] is sent with one batch request holding one message
    /// per address, in order. Nothing is retried.
    ///
    /// Failures are logged here and returned to the caller, so callers only
    /// need to decide how to present them.
    pub async fn send(&self, recipient: &Recipient, subject: &str, content: &str) -> DispatchResult {
        let result = self.try_send(recipient, subject, content).await;

        match &result {
            Ok(_) => tracing::info!(
                provider = self.provider.name(),
                recipients = recipient.len(),
                "sent email \"{subject}\""
            ),
            Err(error) => tracing::error!(
                provider = self.provider.name(),
                recipients = recipient.len(),
                "failed to send email \"{subject}\": {error}"
            ),
        }

        result
    }

    async fn try_send(&self, recipient: &Recipient, subject: &str, content: &str) -> DispatchResult {
        match recipient {
            Recipient::Single(address) => {
                let email = self.message(address, subject, content);
                let sent = self.provider.send(&email).await?;

                Ok(DispatchData::Single(sent))
            }
            Recipient::Many(addresses) => {
                if addresses.is_empty() {
                    return Err(DispatchError::NoRecipients);
                }

                let emails = addresses
                    .iter()
                    .map(|address| self.message(address, subject, content))
                    .collect::<Vec<_>>();
                let response = self.provider.send_batch(&emails).await?;

                Ok(DispatchData::Batch(response))
            }
        }
    }

    fn message(&self, to: &EmailAddress, subject: &str, content: &str) -> OutgoingEmail {
        OutgoingEmail {
            from: self.sender.clone(),
            to: to.clone(),
            subject: subject.to_owned(),
            html: content.to_owned(),
        }
    }
}

impl Debug for EmailDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailDispatcher")
            .field("provider", &self.provider.name())
            .field("sender", &self.sender)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::email::{BatchResponse, EmailProvider, OutgoingEmail, ProviderError, SentEmail};

    /// A request the [StubProvider] received.
    #[derive(Debug, Clone, PartialEq)]
    pub enum ProviderCall {
        Single(OutgoingEmail),
        Batch(Vec<OutgoingEmail>),
    }

    /// An [EmailProvider] that records requests and replies with canned
    /// responses.
    pub struct StubProvider {
        single_response: Result<SentEmail, ProviderError>,
        batch_response: Result<BatchResponse, ProviderError>,
        calls: Mutex<Vec<ProviderCall>>,
    }

    impl StubProvider {
        pub fn new(
            single_response: Result<SentEmail, ProviderError>,
            batch_response: Result<BatchResponse, ProviderError>,
        ) -> Self {
            Self {
                single_response,
                batch_response,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// A provider where every request succeeds.
        pub fn succeeding() -> Self {
            Self::new(
                Ok(SentEmail::new("1")),
                Ok(BatchResponse::new(vec![
                    SentEmail::new("1"),
                    SentEmail::new("2"),
                ])),
            )
        }

        /// A provider where every request fails with `error`.
        pub fn failing(error: ProviderError) -> Self {
            Self::new(Err(error.clone()), Err(error))
        }

        pub fn calls(&self) -> Vec<ProviderCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EmailProvider for StubProvider {
        async fn send(&self, email: &OutgoingEmail) -> Result<SentEmail, ProviderError> {
            self.calls
                .lock()
                .unwrap()
                .push(ProviderCall::Single(email.clone()));
            self.single_response.clone()
        }

        async fn send_batch(
            &self,
            emails: &[OutgoingEmail],
        ) -> Result<BatchResponse, ProviderError> {
            self.calls
                .lock()
                .unwrap()
                .push(ProviderCall::Batch(emails.to_vec()));
            self.batch_response.clone()
        }

        fn name(&self) -> &'static str {
            "Stub"
        }
    }
}
