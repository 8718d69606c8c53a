use std::fmt::Display;

use email_address::{EmailAddress, Options};
use serde::{Deserialize, Serialize};

use crate::Error;

/// An email address used to identify a user when they log in.
///
/// Addresses are trimmed and lowercased so that the same mailbox always maps
/// to the same user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Create and validate an email address.
    ///
    /// # Errors
    ///
    /// This function will return [Error::InvalidEmail] if `raw_email` is not a valid email address.
    pub fn new(raw_email: &str) -> Result<Self, Error> {
        let email = raw_email.trim().to_lowercase();

        match EmailAddress::parse_with_options(&email, Options::default().without_display_text())
        {
            Ok(_) => Ok(Self(email)),
            Err(error) => {
                tracing::debug!("Rejected email address {raw_email:?}: {error}");
                Err(Error::InvalidEmail(raw_email.to_owned()))
            }
        }
    }

    /// Create a new `Email` without any validation.
    ///
    /// The caller should ensure that `raw_email` is a correctly formatted email address,
    /// e.g. one read back from the database.
    pub fn new_unchecked(raw_email: &str) -> Self {
        Self(raw_email.to_owned())
    }

    /// The email address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
