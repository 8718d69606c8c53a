//! Database functions for storing, querying and managing transactions.

use rusqlite::{Connection, Row, params};

use crate::{
    Error,
    auth::UserID,
    database_id::TransactionId,
    transaction::{Transaction, TransactionBuilder, filter::ResolvedFilter},
};

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                amount REAL NOT NULL CHECK (amount >= 0),
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                category TEXT NOT NULL CHECK (category IN ('salary', 'freelance', 'food', \
                    'entertainment', 'investment', 'travel', 'education', 'medical', 'tax')),
                date TEXT NOT NULL,
                reference TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Every query is scoped to one user and a date range.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

fn validate_amount(amount: f64) -> Result<(), Error> {
    if !amount.is_finite() {
        return Err(Error::InvalidTransaction(format!(
            "amount must be a finite number, got {amount}"
        )));
    }

    if amount < 0.0 {
        return Err(Error::InvalidTransaction(format!(
            "amount cannot be negative, got {amount}"
        )));
    }

    Ok(())
}

fn map_constraint_error(error: rusqlite::Error, owner: UserID) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::InvalidTransaction(format!("user {owner} does not exist")),
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_CHECK,
            },
            description,
        ) => Error::InvalidTransaction(
            description.unwrap_or_else(|| "constraint failed".to_owned()),
        ),
        error => error.into(),
    }
}

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidTransaction] if the amount is negative or not finite, or the owner does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate_amount(builder.amount)?;

    connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, amount, type, category, date, reference, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, user_id, amount, type, category, date, reference, description",
        )?
        .query_row(
            params![
                builder.owner.as_i64(),
                builder.amount,
                builder.transaction_type,
                builder.category,
                builder.date,
                builder.reference,
                builder.description,
            ],
            map_transaction_row,
        )
        .map_err(|error| map_constraint_error(error, builder.owner))
}

/// Retrieve the transaction `id` recorded by `owner`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `owner`,
/// - or [Error::SqlError] there is some other SQL error.
#[cfg(test)]
pub fn get_transaction(
    id: TransactionId,
    owner: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, amount, type, category, date, reference, description
             FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &id), (":user_id", &owner.as_i64())],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Replace every field of the transaction `id` with the fields in `builder`.
///
/// The transaction must belong to `builder.owner`, the owner itself never changes.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction owned by `builder.owner`,
/// - [Error::InvalidTransaction] if the amount is negative or not finite,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<(), Error> {
    validate_amount(builder.amount)?;

    let rows_affected = connection
        .execute(
            "UPDATE \"transaction\"
            SET \
                amount = ?1, \
                type = ?2, \
                category = ?3, \
                date = ?4, \
                reference = ?5, \
                description = ?6 \
            WHERE id = ?7 AND user_id = ?8;",
            params![
                builder.amount,
                builder.transaction_type,
                builder.category,
                builder.date,
                builder.reference,
                builder.description,
                id,
                builder.owner.as_i64(),
            ],
        )
        .map_err(|error| map_constraint_error(error, builder.owner))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Delete the transaction `id` recorded by `owner`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction owned by `owner`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    owner: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, owner.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Get the transactions selected by `filter`, newest first.
///
/// Returns exactly the stored transactions for which [ResolvedFilter::matches] holds.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn query_transactions(
    filter: &ResolvedFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, amount, type, category, date, reference, description
             FROM \"transaction\"
             WHERE user_id = ?1
                AND date BETWEEN ?2 AND ?3
                AND (?4 IS NULL OR type = ?4)
             ORDER BY date DESC, id DESC",
        )?
        .query_map(
            params![
                filter.owner.as_i64(),
                filter.date_range.start,
                filter.date_range.end,
                filter.type_filter.transaction_type(),
            ],
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let owner: i64 = row.get(1)?;
    let amount = row.get(2)?;
    let transaction_type = row.get(3)?;
    let category = row.get(4)?;
    let date = row.get(5)?;
    let reference = row.get(6)?;
    let description = row.get(7)?;

    Ok(Transaction {
        id,
        owner: UserID::new(owner),
        amount,
        transaction_type,
        category,
        date,
        reference,
        description,
    })
}
