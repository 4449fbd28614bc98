// Copyright (c) 2025 Caisse contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use caisse::commands::auth::{self, AuthError};
use caisse::db;
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

#[test]
fn register_then_login() {
    let conn = setup();
    let id = auth::register(&conn, "amina", "s3cret", "Amina Diallo").unwrap();
    assert_eq!(auth::login(&conn, "amina", "s3cret").unwrap(), id);
}

#[test]
fn login_rejects_wrong_password() {
    let conn = setup();
    auth::register(&conn, "amina", "s3cret", "Amina Diallo").unwrap();
    let err = auth::login(&conn, "amina", "nope").unwrap_err();
    assert_eq!(
        err.downcast_ref::<AuthError>(),
        Some(&AuthError::InvalidCredentials)
    );
}

#[test]
fn login_rejects_unknown_user() {
    let conn = setup();
    let err = auth::login(&conn, "ghost", "whatever").unwrap_err();
    assert_eq!(
        err.downcast_ref::<AuthError>(),
        Some(&AuthError::InvalidCredentials)
    );
}

#[test]
fn duplicate_username_rejected() {
    let conn = setup();
    auth::register(&conn, "amina", "s3cret", "Amina Diallo").unwrap();
    let err = auth::register(&conn, "amina", "other", "Someone Else").unwrap_err();
    assert_eq!(
        err.downcast_ref::<AuthError>(),
        Some(&AuthError::UsernameTaken("amina".into()))
    );
    // The original account is untouched.
    auth::login(&conn, "amina", "s3cret").unwrap();
}

#[test]
fn stored_hash_is_not_the_password() {
    let conn = setup();
    auth::register(&conn, "amina", "s3cret", "Amina Diallo").unwrap();
    let hash: String = conn
        .query_row(
            "SELECT password_hash FROM users WHERE username='amina'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_ne!(hash, "s3cret");
    assert!(hash.starts_with("$2"));
}
