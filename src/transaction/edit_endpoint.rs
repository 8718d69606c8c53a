use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::UserID,
    database_id::TransactionId,
    db::lock_connection,
    json_body::{JsonBody, RequestBody},
    message::StatusMessage,
    transaction::{form::TransactionForm, update_transaction},
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The replacement fields for the transaction `transaction_id`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTransactionRequest {
    pub payload: TransactionForm,
    pub transaction_id: TransactionId,
}

impl RequestBody for EditTransactionRequest {
    fn invalid_body(message: String) -> Error {
        Error::InvalidTransaction(message)
    }
}

/// A route handler for replacing the fields of one of the logged in user's transactions.
pub async fn edit_transaction(
    State(state): State<EditTransactionState>,
    Extension(user_id): Extension<UserID>,
    JsonBody(request): JsonBody<EditTransactionRequest>,
) -> Result<Json<StatusMessage>, Error> {
    let transaction_id = request.transaction_id;
    let builder = request.payload.into_builder(user_id)?;

    let connection = lock_connection(&state.db_connection)?;
    update_transaction(transaction_id, builder, &connection).inspect_err(|error| {
        tracing::debug!("Could not update transaction {transaction_id}: {error}");
    })?;

    Ok(Json(StatusMessage::new("Transaction updated successfully")))
}
