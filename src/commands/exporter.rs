// Copyright (c) 2025 Caisse contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::require_user;
use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("revenues", sub)) => export(conn, sub, Kind::Revenues),
        Some(("expenses", sub)) => export(conn, sub, Kind::Expenses),
        _ => Ok(()),
    }
}

#[derive(Clone, Copy)]
enum Kind {
    Revenues,
    Expenses,
}

fn export(conn: &Connection, sub: &clap::ArgMatches, kind: Kind) -> Result<()> {
    let user_id = require_user(conn)?;
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    // Validate before touching the output path so a bad format writes nothing.
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let (label, headers, sql) = match kind {
        Kind::Revenues => (
            "revenues",
            ["date", "type", "client", "amount", "description"],
            "SELECT date, type, client, amount, COALESCE(description,'')
             FROM revenues WHERE user_id=?1 ORDER BY date, id",
        ),
        Kind::Expenses => (
            "expenses",
            ["date", "type", "supplier", "amount", "description"],
            "SELECT date, type, supplier, amount, COALESCE(description,'')
             FROM expenses WHERE user_id=?1 ORDER BY date, id",
        ),
    };

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok([
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
        ])
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(headers)?;
            for row in rows {
                wtr.write_record(row?)?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let [date, typ, party, amount, description] = row?;
                items.push(match kind {
                    Kind::Revenues => json!({
                        "date": date, "type": typ, "client": party,
                        "amount": amount, "description": description,
                    }),
                    Kind::Expenses => json!({
                        "date": date, "type": typ, "supplier": party,
                        "amount": amount, "description": description,
                    }),
                });
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => unreachable!(),
    }
    println!("Exported {} to {}", label, out);
    Ok(())
}
