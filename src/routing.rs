//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    AppState, Error,
    auth::{auth_guard, get_current_user, post_log_in, post_log_out, register_user},
    endpoints,
    transaction::{
        add_transaction, delete_transaction_endpoint, edit_transaction, get_all_transactions,
        get_analytics,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_OUT, post(post_log_out));

    let protected_routes = Router::new()
        .route(endpoints::CURRENT_USER, get(get_current_user))
        .route(endpoints::GET_ALL_TRANSACTIONS, post(get_all_transactions))
        .route(endpoints::GET_ANALYTICS, post(get_analytics))
        .route(endpoints::ADD_TRANSACTION, post(add_transaction))
        .route(endpoints::EDIT_TRANSACTION, post(edit_transaction))
        .route(
            endpoints::DELETE_TRANSACTION,
            post(delete_transaction_endpoint),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}
