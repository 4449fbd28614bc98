// Copyright (c) 2025 Caisse contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use caisse::commands::revenues;
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
    if let Some(("revenue", sub)) = matches.subcommand() {
        revenues::handle(conn, sub)
    } else {
        panic!("revenue command not parsed");
    }
}

#[test]
fn add_inserts_row_scoped_to_user() {
    let conn = setup();
    run(
        &conn,
        &[
            "caisse", "revenue", "add", "--date", "2026-08-10", "--type", "Sale", "--client",
            "Boutique Fleur", "--amount", "25000",
        ],
    )
    .unwrap();
    let (user_id, amount): (i64, String) = conn
        .query_row("SELECT user_id, amount FROM revenues", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .unwrap();
    assert_eq!(user_id, 1);
    assert_eq!(amount, "25000");
}

#[test]
fn add_rejects_non_positive_amount() {
    let conn = setup();
    let err = run(
        &conn,
        &[
            "caisse", "revenue", "add", "--date", "2026-08-10", "--type", "Sale", "--amount", "0",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("greater than 0"));
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM revenues", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
}

#[test]
fn add_rejects_unknown_type() {
    let conn = setup();
    let err = run(
        &conn,
        &[
            "caisse", "revenue", "add", "--type", "Lottery", "--amount", "100",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Unknown revenue type"));
}

#[test]
fn month_filter_covers_and_excludes() {
    let conn = setup();
    for (date, amount) in [("2026-08-10", "100"), ("2026-08-20", "200"), ("2026-09-01", "400")] {
        conn.execute(
            "INSERT INTO revenues(user_id, date, type, amount) VALUES(1, ?1, 'Sale', ?2)",
            [date, amount],
        )
        .unwrap();
    }

    let matches =
        cli::build_cli().get_matches_from(["caisse", "revenue", "list", "--month", "2026-08"]);
    let Some(("revenue", rev_m)) = matches.subcommand() else {
        panic!("revenue command not parsed");
    };
    let Some(("list", list_m)) = rev_m.subcommand() else {
        panic!("list subcommand not parsed");
    };
    let rows = revenues::query_rows(&conn, 1, list_m).unwrap();
    assert_eq!(rows.len(), 2);
    // Newest first.
    assert_eq!(rows[0].date, "2026-08-20");
    assert_eq!(rows[1].date, "2026-08-10");
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    for i in 1..=3 {
        conn.execute(
            "INSERT INTO revenues(user_id, date, type, amount) VALUES(1, ?1, 'Sale', '10')",
            [format!("2026-01-0{}", i)],
        )
        .unwrap();
    }
    let matches =
        cli::build_cli().get_matches_from(["caisse", "revenue", "list", "--limit", "2"]);
    let Some(("revenue", rev_m)) = matches.subcommand() else {
        panic!("revenue command not parsed");
    };
    let Some(("list", list_m)) = rev_m.subcommand() else {
        panic!("list subcommand not parsed");
    };
    let rows = revenues::query_rows(&conn, 1, list_m).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2026-01-03");
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
        "INSERT INTO revenues(user_id, date, type, amount) VALUES(2, '2026-08-10', 'Sale', '999')",
        [],
    )
    .unwrap();
    let matches = cli::build_cli().get_matches_from(["caisse", "revenue", "list"]);
    let Some(("revenue", rev_m)) = matches.subcommand() else {
        panic!("revenue command not parsed");
    };
    let Some(("list", list_m)) = rev_m.subcommand() else {
        panic!("list subcommand not parsed");
    };
    let rows = revenues::query_rows(&conn, 1, list_m).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn add_requires_login() {
    let conn = setup();
    utils::clear_current_user(&conn).unwrap();
    let err = run(
        &conn,
        &["caisse", "revenue", "add", "--type", "Sale", "--amount", "100"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Not logged in"));
}
