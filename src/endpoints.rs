//! The API endpoints URIs.
//!
//! Every endpoint takes its arguments in a JSON request body, so none of the
//! paths have parameters.

/// The route for creating a new user.
pub const REGISTER: &str = "/api/users/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/users/login";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/users/logout";
/// The route for getting the profile of the current user.
pub const CURRENT_USER: &str = "/api/users/me";

/// The route for listing the transactions selected by a filter.
pub const GET_ALL_TRANSACTIONS: &str = "/api/transactions/get-all-transactions";
/// The route for summarising the transactions selected by a filter.
pub const GET_ANALYTICS: &str = "/api/transactions/get-analytics";
/// The route to create a transaction.
pub const ADD_TRANSACTION: &str = "/api/transactions/add-transaction";
/// The route to update a transaction.
pub const EDIT_TRANSACTION: &str = "/api/transactions/edit-transaction";
/// The route to delete a transaction.
pub const DELETE_TRANSACTION: &str = "/api/transactions/delete-transaction";
