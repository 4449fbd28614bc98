// Copyright (c) 2025 Caisse contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    maybe_print_json, parse_date, parse_positive_amount, pretty_table, require_user,
};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = require_user(conn)?;
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    if name.is_empty() {
        bail!("Client name must not be empty");
    }
    let contact = sub
        .get_one::<String>("contact")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let service_type = sub
        .get_one::<String>("service-type")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let service_date = sub
        .get_one::<String>("service-date")
        .map(|s| parse_date(s))
        .transpose()?;
    let amount_paid = sub
        .get_one::<String>("amount-paid")
        .map(|s| parse_positive_amount(s))
        .transpose()?;
    let comments = sub.get_one::<String>("comments").map(|s| s.to_string());

    conn.execute(
        "INSERT INTO clients(user_id, name, contact, service_type, service_date,
                             amount_paid, comments)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user_id,
            name,
            contact,
            service_type,
            service_date.map(|d| d.to_string()),
            amount_paid.map(|a| a.to_string()),
            comments
        ],
    )?;
    println!("Added client '{}'", name);
    Ok(())
}

#[derive(Serialize)]
pub struct ClientRow {
    pub name: String,
    pub contact: String,
    pub service_type: String,
    pub service_date: String,
    pub amount_paid: String,
    pub comments: String,
}

pub fn query_rows(conn: &Connection, user_id: i64) -> Result<Vec<ClientRow>> {
    let mut stmt = conn.prepare(
        "SELECT name, contact, service_type, service_date, amount_paid, comments
         FROM clients WHERE user_id=?1 ORDER BY name",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let service_date: Option<String> = r.get(3)?;
        let amount_paid: Option<String> = r.get(4)?;
        let comments: Option<String> = r.get(5)?;
        data.push(ClientRow {
            name: r.get(0)?,
            contact: r.get(1)?,
            service_type: r.get(2)?,
            service_date: service_date.unwrap_or_default(),
            amount_paid: amount_paid.unwrap_or_default(),
            comments: comments.unwrap_or_default(),
        });
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = require_user(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, user_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    r.name,
                    r.contact,
                    r.service_type,
                    r.service_date,
                    r.amount_paid,
                    r.comments,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Name", "Contact", "Service", "Date", "Paid", "Comments"],
                rows,
            )
        );
    }
    Ok(())
}
