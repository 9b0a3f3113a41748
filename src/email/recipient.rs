use serde::{Deserialize, Serialize};

use crate::email::EmailAddress;

/// Who an email should be delivered to.
///
/// The variant decides how the email is dispatched: a single address is sent
/// as one message, a list is sent as one batch with a message per address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipient {
    /// One address, sent with a single-send request.
    Single(EmailAddress),
    /// A list of addresses, sent with one batch request.
    Many(Vec<EmailAddress>),
}

impl Recipient {
    /// Build a recipient from a list of addresses, collapsing a list of one
    /// address into [Recipient::Single].
    ///
    /// Returns `None` if `addresses` is empty.
    pub fn from_addresses(mut addresses: Vec<EmailAddress>) -> Option<Self> {
        match addresses.len() {
            0 => None,
            1 => addresses.pop().map(Recipient::Single),
            _ => Some(Recipient::Many(addresses)),
        }
    }

    /// The number of addresses that will receive a message.
    pub fn len(&self) -> usize {
        match self {
            Recipient::Single(_) => 1,
            Recipient::Many(addresses) => addresses.len(),
        }
    }

    /// Whether there is nobody to send to, only possible for an empty [Recipient::Many].
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<EmailAddress> for Recipient {
    fn from(address: EmailAddress) -> Self {
        Recipient::Single(address)
    }
}

impl From<Vec<EmailAddress>> for Recipient {
    fn from(addresses: Vec<EmailAddress>) -> Self {
        Recipient::Many(addresses)
    }
}
