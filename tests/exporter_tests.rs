// Copyright (c) 2025 Caisse contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use caisse::commands::exporter;
use caisse::{cli, db, utils};
use rusqlite::Connection;
use serde_json::json;
use tempfile::tempdir;

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

#[test]
fn export_expenses_as_json() {
    let conn = setup();
    conn.execute(
        "INSERT INTO expenses(user_id, date, type, amount, supplier, description)
         VALUES(1, '2026-08-05', 'Food', '12000', 'Marche Central', 'weekly groceries')",
        [],
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "caisse", "export", "expenses", "--format", "json", "--out", &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "date": "2026-08-05",
                "type": "Food",
                "supplier": "Marche Central",
                "amount": "12000",
                "description": "weekly groceries"
            }
        ])
    );
}

#[test]
fn export_revenues_as_csv() {
    let conn = setup();
    conn.execute(
        "INSERT INTO revenues(user_id, date, type, client, amount)
         VALUES(1, '2026-08-10', 'Sale', 'Boutique Fleur', '25000')",
        [],
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "caisse", "export", "revenues", "--format", "csv", "--out", &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next().unwrap(), "date,type,client,amount,description");
    assert_eq!(
        lines.next().unwrap(),
        "2026-08-10,Sale,Boutique Fleur,25000,"
    );
}

#[test]
fn export_skips_other_users_rows() {
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

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "caisse", "export", "revenues", "--format", "json", "--out", &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }
    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(parsed, json!([]));
}

#[test]
fn export_rejects_unknown_format() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "caisse", "export", "revenues", "--format", "xml", "--out", &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        assert!(exporter::handle(&conn, export_m).is_err());
    } else {
        panic!("no export subcommand");
    }
    assert!(!out_path.exists());
}
