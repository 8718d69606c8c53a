//! Summarises the transactions selected by a filter.

use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    auth::UserID,
    json_body::JsonBody,
    transaction::{
        analytics::TransactionSummary,
        filter::FilterQuery,
        list_endpoint::{TransactionsState, get_filtered_transactions},
    },
};

/// A route handler that returns the summary of the logged in user's transactions selected by the filter.
pub async fn get_analytics(
    State(state): State<TransactionsState>,
    Extension(user_id): Extension<UserID>,
    JsonBody(query): JsonBody<FilterQuery>,
) -> Result<Json<TransactionSummary>, Error> {
    let transactions = get_filtered_transactions(&state, user_id, &query)?;

    Ok(Json(TransactionSummary::new(&transactions)))
}
