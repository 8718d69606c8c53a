//! Defines the core data models for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{auth::UserID, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in.
    Income,
    /// Money going out.
    #[serde(alias = "expence")]
    Expense,
}

impl TransactionType {
    /// Every transaction type.
    pub const ALL: [TransactionType; 2] = [TransactionType::Income, TransactionType::Expense];

    /// The name used for this type on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

/// The fixed set of categories a transaction can be filed under.
///
/// The declaration order is the order categories are reported in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Salary,
    Freelance,
    Food,
    Entertainment,
    Investment,
    Travel,
    Education,
    Medical,
    Tax,
}

impl Category {
    /// Every category, in reporting order.
    pub const ALL: [Category; 9] = [
        Category::Salary,
        Category::Freelance,
        Category::Food,
        Category::Entertainment,
        Category::Investment,
        Category::Travel,
        Category::Education,
        Category::Medical,
        Category::Tax,
    ];

    /// The name used for this category on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Salary => "salary",
            Category::Freelance => "freelance",
            Category::Food => "food",
            Category::Entertainment => "entertainment",
            Category::Investment => "investment",
            Category::Travel => "travel",
            Category::Education => "education",
            Category::Medical => "medical",
            Category::Tax => "tax",
        }
    }
}

/// A string that does not name a variant of an enumerated field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown {kind} \"{value}\"")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl FromStr for TransactionType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" | "expence" => Ok(TransactionType::Expense),
            _ => Err(UnknownVariant {
                kind: "transaction type",
                value: s.to_owned(),
            }),
        }
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "category",
                value: s.to_owned(),
            })
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    #[serde(rename = "_id")]
    pub id: TransactionId,
    /// The user that recorded the transaction.
    #[serde(rename = "userid")]
    pub owner: UserID,
    /// The amount of money spent or earned, never negative.
    pub amount: f64,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// What the money was earned or spent on.
    pub category: Category,
    /// When the transaction happened.
    pub date: Date,
    /// Free text, e.g. a receipt or invoice number.
    pub reference: String,
    /// A text description of what the transaction was for.
    pub description: String,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        owner: UserID,
        amount: f64,
        transaction_type: TransactionType,
        category: Category,
        date: Date,
    ) -> TransactionBuilder {
        TransactionBuilder {
            owner,
            amount,
            transaction_type,
            category,
            date,
            reference: String::new(),
            description: String::new(),
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The reference and description default to empty strings.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// let builder = Transaction::build(
///         user_id,
///         45.99,
///         TransactionType::Expense,
///         Category::Food,
///         date!(2025-01-15),
///     )
///     .description("Groceries");
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The user recording the transaction.
    pub owner: UserID,
    /// The monetary amount of the transaction, must be finite and not negative.
    pub amount: f64,
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,
    /// What the money was earned or spent on.
    pub category: Category,
    /// The date when the transaction occurred.
    pub date: Date,
    /// Free text, e.g. a receipt or invoice number.
    pub reference: String,
    /// A human-readable description of the transaction.
    pub description: String,
}

impl TransactionBuilder {
    /// Set the reference for the transaction.
    pub fn reference(mut self, reference: &str) -> Self {
        self.reference = reference.to_owned();
        self
    }

    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }
}

// ============================================================================
// WIRE DATES
// ============================================================================

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse a date sent by a client.
///
/// Accepts plain dates ("2024-01-31") and ISO 8601 date-times
/// ("2024-01-31T00:00:00.000Z"), in which case only the date part is used.
pub fn parse_wire_date(raw: &str) -> Result<Date, time::error::Parse> {
    let date_part = raw.trim().split('T').next().unwrap_or_default();

    Date::parse(date_part, DATE_FORMAT)
}

/// Deserialize a date with [parse_wire_date].
pub(crate) fn deserialize_wire_date<'de, D>(deserializer: D) -> Result<Date, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    parse_wire_date(&raw).map_err(serde::de::Error::custom)
}
