//! Handles requests to create a new user account.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{Email, PasswordHash, UserProfile, create_user},
    db::lock_connection,
    json_body::{JsonBody, RequestBody},
};

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The database connection for storing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The details sent by the client to register.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterData {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RequestBody for RegisterData {}

/// Create a new user and return their profile.
///
/// The client should log in afterwards to start a session.
///
/// # Errors
///
/// Returns:
/// - [Error::EmptyName] if the name is blank,
/// - [Error::InvalidEmail] if the email address is malformed,
/// - [Error::TooWeak] if the password is too easy to guess,
/// - [Error::DuplicateEmail] if the email address is already registered.
pub async fn register_user(
    State(state): State<RegistrationState>,
    JsonBody(user_data): JsonBody<RegisterData>,
) -> Result<(StatusCode, Json<UserProfile>), Error> {
    let name = user_data.name.trim();
    if name.is_empty() {
        return Err(Error::EmptyName);
    }

    let email = Email::new(&user_data.email)?;
    let password_hash = PasswordHash::from_raw_password(
        &user_data.password,
        &[name, email.as_str()],
        PasswordHash::DEFAULT_COST,
    )
    .inspect_err(|error| {
        if let Error::HashingError(message) = error {
            tracing::error!("an error occurred while hashing a password: {message}");
        }
    })?;

    let connection = lock_connection(&state.db_connection)?;
    let user = create_user(name, email, password_hash, &connection)?;

    tracing::info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(UserProfile::from(&user))))
}
