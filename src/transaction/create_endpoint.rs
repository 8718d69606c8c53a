use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    db::lock_connection,
    json_body::JsonBody,
    transaction::{Transaction, create_transaction, form::TransactionForm},
};

/// The state needed for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction owned by the logged in user.
///
/// Responds with the stored transaction.
pub async fn add_transaction(
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserID>,
    JsonBody(form): JsonBody<TransactionForm>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let builder = form.into_builder(user_id)?;

    let connection = lock_connection(&state.db_connection)?;
    let transaction = create_transaction(builder, &connection).inspect_err(|error| {
        tracing::debug!("Could not create transaction for user {user_id}: {error}");
    })?;

    Ok((StatusCode::CREATED, Json(transaction)))
}
