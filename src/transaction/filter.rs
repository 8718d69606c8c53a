//! Turns the filter sent by a client into a concrete predicate over transactions.
//!
//! Resolution is pure: "today" is passed in by the caller so that the result
//! only depends on the arguments.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{Date, Duration};

use crate::{
    Error,
    auth::UserID,
    json_body::RequestBody,
    transaction::{Transaction, TransactionType, core::parse_wire_date},
};

/// How far back to look for transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    /// The last 7 days, including today.
    LastWeek,
    /// The last 30 days, including today.
    LastMonth,
    /// The last 365 days, including today.
    LastYear,
    /// An explicit range chosen by the client.
    Custom,
}

impl Frequency {
    /// The number of days in the window ending today, or `None` for [Frequency::Custom].
    pub fn days(&self) -> Option<i64> {
        match self {
            Frequency::LastWeek => Some(7),
            Frequency::LastMonth => Some(30),
            Frequency::LastYear => Some(365),
            Frequency::Custom => None,
        }
    }
}

impl FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7" => Ok(Frequency::LastWeek),
            "30" => Ok(Frequency::LastMonth),
            "365" => Ok(Frequency::LastYear),
            "custom" => Ok(Frequency::Custom),
            _ => Err(Error::InvalidFilter(format!("unknown frequency \"{s}\""))),
        }
    }
}

/// Which transaction types to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFilter {
    All,
    Only(TransactionType),
}

impl TypeFilter {
    /// The single type this filter keeps, or `None` if it keeps every type.
    pub fn transaction_type(&self) -> Option<TransactionType> {
        match self {
            TypeFilter::All => None,
            TypeFilter::Only(transaction_type) => Some(*transaction_type),
        }
    }

    fn matches(&self, transaction_type: TransactionType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => *wanted == transaction_type,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(TypeFilter::All);
        }

        s.parse::<TransactionType>()
            .map(TypeFilter::Only)
            .map_err(|error| Error::InvalidFilter(error.to_string()))
    }
}

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    /// Create a range from `start` to `end`, both inclusive.
    ///
    /// # Errors
    /// Returns [Error::InvalidFilter] if `start` is after `end`.
    pub fn new(start: Date, end: Date) -> Result<Self, Error> {
        if start > end {
            return Err(Error::InvalidFilter(format!(
                "the range start {start} is after the range end {end}"
            )));
        }

        Ok(Self { start, end })
    }

    /// The `days` days ending on `today`, e.g. 7 days gives `[today - 6, today]`.
    ///
    /// Saturates at the earliest representable date.
    pub fn last_days(today: Date, days: i64) -> Self {
        let start = today
            .checked_sub(Duration::days(days.saturating_sub(1).max(0)))
            .unwrap_or(Date::MIN);

        Self { start, end: today }
    }

    /// Whether `date` lies within the range, edges included.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The transaction filter as sent by the client.
///
/// Missing `frequency` or `type` fields are treated like unknown tokens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    /// The user the client believes is logged in, checked against the session.
    #[serde(default)]
    pub userid: Option<UserID>,
    /// One of "7", "30", "365" or "custom".
    #[serde(default)]
    pub frequency: String,
    /// `[start, end]` when `frequency` is "custom".
    #[serde(default)]
    pub selected_range: Option<Value>,
    /// One of "all", "income" or "expense".
    #[serde(default, rename = "type")]
    pub transaction_type: String,
}

impl RequestBody for FilterQuery {
    fn invalid_body(message: String) -> Error {
        Error::InvalidFilter(message)
    }
}

impl FilterQuery {
    /// Resolve the query into a predicate over the transactions of `owner`.
    ///
    /// # Errors
    /// Returns [Error::InvalidFilter] if the frequency or type is not a known
    /// token, or if a custom range is missing or malformed.
    pub fn resolve(&self, owner: UserID, today: Date) -> Result<ResolvedFilter, Error> {
        let frequency: Frequency = self.frequency.parse()?;
        let type_filter: TypeFilter = self.transaction_type.parse()?;

        let date_range = match frequency.days() {
            Some(days) => DateRange::last_days(today, days),
            None => parse_selected_range(self.selected_range.as_ref())?,
        };

        Ok(ResolvedFilter {
            owner,
            date_range,
            type_filter,
        })
    }
}

fn parse_selected_range(selected_range: Option<&Value>) -> Result<DateRange, Error> {
    let bounds = match selected_range {
        Some(Value::Array(bounds)) if bounds.len() == 2 => bounds,
        Some(Value::Array(bounds)) => {
            return Err(Error::InvalidFilter(format!(
                "a custom range needs a start and an end date, got {} dates",
                bounds.len()
            )));
        }
        Some(Value::Null) | None => {
            return Err(Error::InvalidFilter(
                "a custom range needs a start and an end date".to_owned(),
            ));
        }
        Some(other) => {
            return Err(Error::InvalidFilter(format!(
                "expected a list of two dates, got {other}"
            )));
        }
    };

    let start = parse_range_bound(&bounds[0])?;
    let end = parse_range_bound(&bounds[1])?;

    DateRange::new(start, end)
}

fn parse_range_bound(value: &Value) -> Result<Date, Error> {
    let raw = value
        .as_str()
        .ok_or_else(|| Error::InvalidFilter(format!("expected a date string, got {value}")))?;

    parse_wire_date(raw)
        .map_err(|error| Error::InvalidFilter(format!("invalid date \"{raw}\": {error}")))
}

/// A filter with every token resolved, ready to be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFilter {
    /// Only transactions recorded by this user are kept.
    pub owner: UserID,
    /// Only transactions dated within this range are kept.
    pub date_range: DateRange,
    /// Only transactions of this type are kept.
    pub type_filter: TypeFilter,
}

impl ResolvedFilter {
    /// Whether `transaction` is selected by this filter.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        transaction.owner == self.owner
            && self.date_range.contains(transaction.date)
            && self.type_filter.matches(transaction.transaction_type)
    }
}
