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
    transaction::delete_transaction,
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The transaction to delete.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTransactionRequest {
    pub transaction_id: TransactionId,
}

impl RequestBody for DeleteTransactionRequest {
    fn invalid_body(message: String) -> Error {
        Error::InvalidTransaction(message)
    }
}

/// A route handler for deleting one of the logged in user's transactions.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Extension(user_id): Extension<UserID>,
    JsonBody(request): JsonBody<DeleteTransactionRequest>,
) -> Result<Json<StatusMessage>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_transaction(request.transaction_id, user_id, &connection).inspect_err(|error| {
        tracing::debug!(
            "Could not delete transaction {}: {error}",
            request.transaction_id
        );
    })?;

    Ok(Json(StatusMessage::new("Transaction deleted successfully")))
}
