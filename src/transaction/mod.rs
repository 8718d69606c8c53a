//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - The filter resolver that selects transactions by date range and type
//! - The aggregation engine that summarises a set of transactions
//! - Route handlers for the transaction API

mod analytics;
mod analytics_endpoint;
mod core;
mod create_endpoint;
mod db;
mod delete_endpoint;
mod edit_endpoint;
mod filter;
mod form;
mod list_endpoint;
#[cfg(test)]
mod test_utils;

pub use analytics::TransactionSummary;
pub use analytics_endpoint::get_analytics;
pub use core::{Category, Transaction, TransactionBuilder, TransactionType};
pub use create_endpoint::add_transaction;
pub use db::{
    create_transaction, create_transaction_table, delete_transaction, query_transactions,
    update_transaction,
};
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction;
pub use list_endpoint::get_all_transactions;

#[cfg(test)]
pub use db::{count_transactions, get_transaction};
