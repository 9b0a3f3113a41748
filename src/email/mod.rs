//! Outbound transactional email.
//!
//! This module contains:
//! - [EmailAddress] and [Recipient] for describing who receives a message
//! - The [EmailProvider] trait and the Resend implementation
//! - [EmailDispatcher], which chooses between single and batch sends and
//!   turns every failure into a [DispatchError]

mod address;
mod dispatcher;
mod provider;
mod recipient;
mod resend;

pub use address::{EmailAddress, EmailAddressError};
pub use dispatcher::{
    DEFAULT_SENDER, DispatchData, DispatchError, DispatchOutcome, DispatchResult, EmailDispatcher,
};
pub use provider::{BatchResponse, EmailProvider, OutgoingEmail, ProviderError, SentEmail};
pub use recipient::Recipient;
pub use resend::{DEFAULT_RESEND_API_URL, DEFAULT_RESEND_TIMEOUT, ResendConfig, ResendProvider};

#[cfg(test)]
pub(crate) use dispatcher::test_utils::{ProviderCall, StubProvider};
