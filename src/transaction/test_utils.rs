use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    auth::{Email, PasswordHash, UserID, create_user},
    db::initialize,
};

/// An initialized in-memory database with one registered user.
pub fn must_create_test_connection() -> (Arc<Mutex<Connection>>, UserID) {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");
    let user = create_user(
        "Test",
        Email::new_unchecked("test@example.com"),
        PasswordHash::new_unchecked("hunter2"),
        &connection,
    )
    .expect("Could not create test user");

    (Arc::new(Mutex::new(connection)), user.id)
}

/// Register another user in `connection`.
pub fn must_create_other_user(connection: &Mutex<Connection>) -> UserID {
    create_user(
        "Other",
        Email::new_unchecked("other@example.com"),
        PasswordHash::new_unchecked("hunter2"),
        &connection.lock().unwrap(),
    )
    .expect("Could not create other user")
    .id
}
