use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// The error returned when a string is not a usable email address.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("\"{0}\" is not a valid email address")]
pub struct EmailAddressError(pub String);

/// A recipient email address, e.g. "you@example.com".
///
/// Addresses are checked only loosely: the address must be non-empty, contain
/// no whitespace and have a single `@` with text on either side. The provider
/// does the authoritative validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create and validate an email address.
    ///
    /// Leading and trailing whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns an [EmailAddressError] if `raw_email` is not a valid email address.
    pub fn new(raw_email: &str) -> Result<Self, EmailAddressError> {
        let email = raw_email.trim();

        let is_valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !email.chars().any(char::is_whitespace)
            }
            None => false,
        };

        if is_valid {
            Ok(Self(email.to_owned()))
        } else {
            Err(EmailAddressError(raw_email.to_owned()))
        }
    }

    /// Create a new `EmailAddress` without any validation.
    ///
    /// The caller should ensure that `raw_email` is a correctly formatted email
    /// address. For addresses that come from the user or from configuration,
    /// use [EmailAddress::new] instead.
    pub fn new_unchecked(raw_email: &str) -> Self {
        Self(raw_email.to_owned())
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for EmailAddress {
    type Err = EmailAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailAddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod email_address_tests {
    use super::{EmailAddress, EmailAddressError};

    #[test]
    fn create_email_success() {
        let email = EmailAddress::new("foo@bar.baz");

        assert_eq!(email, Ok(EmailAddress::new_unchecked("foo@bar.baz")));
    }

    #[test]
    fn create_email_trims_whitespace() {
        let email = EmailAddress::new("  foo@bar.baz\n").unwrap();

        assert_eq!(email.as_str(), "foo@bar.baz");
    }

    #[test]
    fn create_email_fails_with_no_at_symbol() {
        let email = EmailAddress::new("foobar.baz");

        assert!(matches!(email, Err(EmailAddressError(_))));
    }

    #[test]
    fn create_email_fails_with_empty_string() {
        let email = EmailAddress::new("");

        assert!(matches!(email, Err(EmailAddressError(_))));
    }

    #[test]
    fn create_email_fails_with_missing_local_part_or_domain() {
        for raw in ["@bar.baz", "foo@", "@"] {
            assert!(
                EmailAddress::new(raw).is_err(),
                "want \"{raw}\" to be rejected"
            );
        }
    }

    #[test]
    fn create_email_fails_with_inner_whitespace_or_two_at_symbols() {
        for raw in ["foo bar@baz.qux", "foo@bar@baz"] {
            assert!(
                EmailAddress::new(raw).is_err(),
                "want \"{raw}\" to be rejected"
            );
        }
    }

    #[test]
    fn deserialize_rejects_invalid_address() {
        let result = serde_json::from_str::<EmailAddress>("\"not an email\"");

        assert!(result.is_err());
    }
}
