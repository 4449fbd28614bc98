// Copyright (c) 2025 Caisse contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use caisse::commands::expenses;
use caisse::{cli, db, utils};
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO users(username, password_hash, full_name) VALUES('amina','x','Amina Diallo')",
        [],
    )
    .unwrap();
    utils::set_current_user(&conn, 1).unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args.iter().copied());
    if let Some(("expense", sub)) = matches.subcommand() {
        expenses::handle(conn, sub)
    } else {
        panic!("expense command not parsed");
    }
}

#[test]
fn add_inserts_row_scoped_to_user() {
    let conn = setup();
    run(
        &conn,
        &[
            "caisse", "expense", "add", "--date", "2026-08-05", "--type", "Food", "--amount",
            "12000", "--supplier", "Marche Central",
        ],
    )
    .unwrap();
    let (user_id, amount, supplier): (i64, String, String) = conn
        .query_row("SELECT user_id, amount, supplier FROM expenses", [], |r| {
            Ok((r.get(0)?, r.get(1)?, r.get(2)?))
        })
        .unwrap();
    assert_eq!(user_id, 1);
    assert_eq!(amount, "12000");
    assert_eq!(supplier, "Marche Central");
}

#[test]
fn add_rejects_non_positive_amount() {
    let conn = setup();
    let err = run(
        &conn,
        &[
            "caisse", "expense", "add", "--date", "2026-08-05", "--type", "Food", "--amount", "0",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("greater than 0"));
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM expenses", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
}

#[test]
fn add_rejects_unknown_type() {
    let conn = setup();
    let err = run(
        &conn,
        &[
            "caisse", "expense", "add", "--type", "Gambling", "--amount", "100",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Unknown expense type"));
}

#[test]
fn month_filter_covers_and_excludes() {
    let conn = setup();
    for (date, amount) in [("2026-08-05", "100"), ("2026-08-28", "200"), ("2026-09-02", "400")] {
        conn.execute(
            "INSERT INTO expenses(user_id, date, type, amount) VALUES(1, ?1, 'Food', ?2)",
            [date, amount],
        )
        .unwrap();
    }

    let matches =
        cli::build_cli().get_matches_from(["caisse", "expense", "list", "--month", "2026-08"]);
    let Some(("expense", exp_m)) = matches.subcommand() else {
        panic!("expense command not parsed");
    };
    let Some(("list", list_m)) = exp_m.subcommand() else {
        panic!("list subcommand not parsed");
    };
    let rows = expenses::query_rows(&conn, 1, list_m).unwrap();
    assert_eq!(rows.len(), 2);
    // Newest first.
    assert_eq!(rows[0].date, "2026-08-28");
    assert_eq!(rows[1].date, "2026-08-05");
}

#[test]
fn year_filter_covers_and_excludes() {
    let conn = setup();
    for date in ["2025-12-31", "2026-01-01", "2026-08-05"] {
        conn.execute(
            "INSERT INTO expenses(user_id, date, type, amount) VALUES(1, ?1, 'Food', '10')",
            [date],
        )
        .unwrap();
    }
    let matches =
        cli::build_cli().get_matches_from(["caisse", "expense", "list", "--year", "2026"]);
    let Some(("expense", exp_m)) = matches.subcommand() else {
        panic!("expense command not parsed");
    };
    let Some(("list", list_m)) = exp_m.subcommand() else {
        panic!("list subcommand not parsed");
    };
    let rows = expenses::query_rows(&conn, 1, list_m).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2026-08-05");
}

#[test]
fn other_users_rows_are_invisible() {
    let conn = setup();
    conn.execute(
        "INSERT INTO users(username, password_hash, full_name) VALUES('koffi','x','Koffi A.')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO expenses(user_id, date, type, amount) VALUES(2, '2026-08-05', 'Food', '999')",
        [],
    )
    .unwrap();
    let matches = cli::build_cli().get_matches_from(["caisse", "expense", "list"]);
    let Some(("expense", exp_m)) = matches.subcommand() else {
        panic!("expense command not parsed");
    };
    let Some(("list", list_m)) = exp_m.subcommand() else {
        panic!("list subcommand not parsed");
    };
    let rows = expenses::query_rows(&conn, 1, list_m).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn add_requires_login() {
    let conn = setup();
    utils::clear_current_user(&conn).unwrap();
    let err = run(
        &conn,
        &["caisse", "expense", "add", "--type", "Food", "--amount", "100"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Not logged in"));
}
