//! Lists the transactions selected by a filter.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    db::lock_connection,
    json_body::JsonBody,
    timezone::get_local_date,
    transaction::{Transaction, filter::FilterQuery, form::ensure_same_user, query_transactions},
};

/// The state needed to query transactions.
#[derive(Debug, Clone)]
pub struct TransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Resolve `query` for `user_id` against today's local date and fetch the matching transactions.
pub(crate) fn get_filtered_transactions(
    state: &TransactionsState,
    user_id: UserID,
    query: &FilterQuery,
) -> Result<Vec<Transaction>, Error> {
    ensure_same_user(query.userid, user_id)?;

    let today = get_local_date(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let filter = query.resolve(user_id, today)?;

    let connection = lock_connection(&state.db_connection)?;
    query_transactions(&filter, &connection)
}

/// A route handler that returns the logged in user's transactions selected by the filter, newest first.
pub async fn get_all_transactions(
    State(state): State<TransactionsState>,
    Extension(user_id): Extension<UserID>,
    JsonBody(query): JsonBody<FilterQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    get_filtered_transactions(&state, user_id, &query).map(Json)
}

#[cfg(test)]
mod tests {
    use axum::{Extension, Json, extract::State};
    use time::{Duration, macros::date};

    use crate::{
        Error,
        json_body::JsonBody,
        timezone::get_local_date,
        transaction::{
            Category, Transaction, TransactionType, create_transaction,
            filter::FilterQuery,
            test_utils::{must_create_other_user, must_create_test_connection},
        },
    };

    use super::{TransactionsState, get_all_transactions};

    fn query(value: serde_json::Value) -> FilterQuery {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn returns_recent_transactions_of_session_user() {
        let (db_connection, user_id) = must_create_test_connection();
        let other_user = must_create_other_user(&db_connection);
        let today = get_local_date("Etc/UTC").unwrap();
        let (recent, _old) = {
            let connection = db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(
                    other_user,
                    5.0,
                    TransactionType::Income,
                    Category::Salary,
                    today,
                ),
                &connection,
            )
            .unwrap();
            let recent = create_transaction(
                Transaction::build(
                    user_id,
                    10.0,
                    TransactionType::Expense,
                    Category::Food,
                    today - Duration::days(6),
                ),
                &connection,
            )
            .unwrap();
            let old = create_transaction(
                Transaction::build(
                    user_id,
                    20.0,
                    TransactionType::Expense,
                    Category::Food,
                    today - Duration::days(7),
                ),
                &connection,
            )
            .unwrap();
            (recent, old)
        };
        let state = TransactionsState {
            db_connection,
            local_timezone: "Etc/UTC".to_owned(),
        };

        let Json(transactions) = get_all_transactions(
            State(state),
            Extension(user_id),
            JsonBody(query(serde_json::json!({"frequency": "7", "type": "all"}))),
        )
        .await
        .unwrap();

        assert_eq!(transactions, vec![recent]);
    }

    #[tokio::test]
    async fn custom_range_returns_matching_income() {
        let (db_connection, user_id) = must_create_test_connection();
        let january_income = {
            let connection = db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(
                    user_id,
                    10.0,
                    TransactionType::Expense,
                    Category::Food,
                    date!(2024 - 01 - 10),
                ),
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(
                    user_id,
                    500.0,
                    TransactionType::Income,
                    Category::Salary,
                    date!(2024 - 02 - 01),
                ),
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(
                    user_id,
                    500.0,
                    TransactionType::Income,
                    Category::Salary,
                    date!(2024 - 01 - 31),
                ),
                &connection,
            )
            .unwrap()
        };
        let state = TransactionsState {
            db_connection,
            local_timezone: "Etc/UTC".to_owned(),
        };

        let Json(transactions) = get_all_transactions(
            State(state),
            Extension(user_id),
            JsonBody(query(serde_json::json!({
                "frequency": "custom",
                "selectedRange": ["2024-01-01", "2024-01-31"],
                "type": "income",
            }))),
        )
        .await
        .unwrap();

        assert_eq!(transactions, vec![january_income]);
    }

    #[tokio::test]
    async fn rejects_query_for_other_user() {
        let (db_connection, user_id) = must_create_test_connection();
        let other_user = must_create_other_user(&db_connection);
        let state = TransactionsState {
            db_connection,
            local_timezone: "Etc/UTC".to_owned(),
        };

        let result = get_all_transactions(
            State(state),
            Extension(user_id),
            JsonBody(query(serde_json::json!({
                "userid": other_user.as_i64(),
                "frequency": "7",
                "type": "all",
            }))),
        )
        .await;

        assert_eq!(result.map(|json| json.0), Err(Error::UserMismatch));
    }

    #[tokio::test]
    async fn rejects_invalid_filter() {
        let (db_connection, user_id) = must_create_test_connection();
        let state = TransactionsState {
            db_connection,
            local_timezone: "Etc/UTC".to_owned(),
        };

        let result = get_all_transactions(
            State(state),
            Extension(user_id),
            JsonBody(query(serde_json::json!({"frequency": "custom", "type": "all"}))),
        )
        .await;

        assert!(matches!(result, Err(Error::InvalidFilter(_))));
    }
}
