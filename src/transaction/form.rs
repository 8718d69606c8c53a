//! The transaction fields sent by clients when adding or editing a transaction.

use serde::{Deserialize, Deserializer};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    json_body::RequestBody,
    transaction::{
        Category, Transaction, TransactionBuilder, TransactionType, core::deserialize_wire_date,
    },
};

/// The fields of a transaction as sent by the client.
///
/// `amount` may be a number or a numeric string, since it usually comes
/// straight from a text input.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionForm {
    /// The user the client believes is logged in, checked against the session.
    #[serde(default)]
    pub userid: Option<UserID>,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: Category,
    #[serde(deserialize_with = "deserialize_wire_date")]
    pub date: Date,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub description: String,
}

impl RequestBody for TransactionForm {
    fn invalid_body(message: String) -> Error {
        Error::InvalidTransaction(message)
    }
}

impl TransactionForm {
    /// Convert the form into a builder for a transaction owned by `session_user`.
    ///
    /// # Errors
    /// Returns [Error::UserMismatch] if the form names a different user than `session_user`.
    pub fn into_builder(self, session_user: UserID) -> Result<TransactionBuilder, Error> {
        ensure_same_user(self.userid, session_user)?;

        Ok(Transaction::build(
            session_user,
            self.amount,
            self.transaction_type,
            self.category,
            self.date,
        )
        .reference(&self.reference)
        .description(&self.description))
    }
}

/// Check that the user ID a client sent, if any, is the logged in user.
///
/// # Errors
/// Returns [Error::UserMismatch] if `claimed_user` is set and differs from `session_user`.
pub(crate) fn ensure_same_user(
    claimed_user: Option<UserID>,
    session_user: UserID,
) -> Result<(), Error> {
    match claimed_user {
        Some(claimed_user) if claimed_user != session_user => {
            tracing::warn!(
                "User {session_user} sent a request on behalf of user {claimed_user}"
            );
            Err(Error::UserMismatch)
        }
        _ => Ok(()),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(amount) => Ok(amount),
        RawAmount::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("\"{text}\" is not a number"))),
    }
}
