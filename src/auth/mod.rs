//! User accounts and cookie-based sessions.
//!
//! Handlers behind [auth_guard] receive the logged in user's ID via
//! `Extension<UserID>`.

mod cookie;
mod email;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod profile;
mod register_user;
mod token;
mod user;

pub use cookie::DEFAULT_COOKIE_DURATION;
#[cfg(test)]
pub(crate) use cookie::{COOKIE_TOKEN, set_auth_cookie};
pub use email::Email;
pub use log_in::post_log_in;
pub use log_out::post_log_out;
pub use middleware::auth_guard;
pub use password::{PasswordHash, ValidatedPassword};
pub use profile::get_current_user;
pub use register_user::register_user;
pub use user::{
    User, UserID, UserProfile, create_user, create_user_table, get_user_by_email, get_user_by_id,
};
