// Copyright (c) 2025 Caisse contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{clear_current_user, current_user, set_current_user};
use anyhow::{Result, bail};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),
    // Deliberately does not say which half was wrong.
    #[error("Invalid username or password")]
    InvalidCredentials,
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("register", sub)) => {
            let username = sub
                .get_one::<String>("username")
                .unwrap()
                .trim()
                .to_string();
            let password = sub.get_one::<String>("password").unwrap();
            let full_name = sub
                .get_one::<String>("full-name")
                .unwrap()
                .trim()
                .to_string();
            let id = register(conn, &username, password, &full_name)?;
            set_current_user(conn, id)?;
            println!("Welcome, {}! Logged in as '{}'", full_name, username);
        }
        Some(("login", sub)) => {
            let username = sub
                .get_one::<String>("username")
                .unwrap()
                .trim()
                .to_string();
            let password = sub.get_one::<String>("password").unwrap();
            let id = login(conn, &username, password)?;
            set_current_user(conn, id)?;
            println!("Logged in as '{}'", username);
        }
        Some(("logout", _)) => {
            clear_current_user(conn)?;
            println!("Logged out");
        }
        Some(("whoami", _)) => match current_user(conn)? {
            Some(u) => println!("{} ({})", u.username, u.full_name),
            None => println!("Not logged in"),
        },
        _ => {}
    }
    Ok(())
}

/// Creates the user row and returns its id. The username UNIQUE constraint
/// is the one storage failure surfaced as a typed error.
pub fn register(conn: &Connection, username: &str, password: &str, full_name: &str) -> Result<i64> {
    if username.is_empty() {
        bail!("Username must not be empty");
    }
    if password.is_empty() {
        bail!("Password must not be empty");
    }
    let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
    match conn.execute(
        "INSERT INTO users(username, password_hash, full_name) VALUES (?1, ?2, ?3)",
        params![username, hash, full_name],
    ) {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(AuthError::UsernameTaken(username.to_string()).into())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn login(conn: &Connection, username: &str, password: &str) -> Result<i64> {
    let row: Option<(i64, String)> = conn
        .query_row(
            "SELECT id, password_hash FROM users WHERE username=?1",
            params![username],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;
    let Some((id, hash)) = row else {
        return Err(AuthError::InvalidCredentials.into());
    };
    if !bcrypt::verify(password, &hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }
    Ok(id)
}
