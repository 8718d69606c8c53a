//! Log-out route handler that invalidates the session cookie.

use axum::Json;
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::cookie::invalidate_auth_cookie, message::StatusMessage};

/// Invalidate the auth cookie.
///
/// Succeeds whether or not the client was logged in.
pub async fn post_log_out(jar: PrivateCookieJar) -> (PrivateCookieJar, Json<StatusMessage>) {
    let jar = invalidate_auth_cookie(jar);

    (jar, Json(StatusMessage::new("Logged out successfully")))
}
