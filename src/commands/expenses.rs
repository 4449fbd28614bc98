// Copyright (c) 2025 Caisse contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::EXPENSE_TYPES;
use crate::utils::{
    date_or_today, fmt_fcfa, maybe_print_json, parse_month, parse_positive_amount, parse_year,
    pretty_table, require_user,
};
use anyhow::{Context, Result, bail};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
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
    let date = date_or_today(sub, "date")?;
    let typ = sub.get_one::<String>("type").unwrap().trim().to_string();
    if !EXPENSE_TYPES.contains(&typ.as_str()) {
        bail!(
            "Unknown expense type '{}'. Expected one of: {}",
            typ,
            EXPENSE_TYPES.join(", ")
        );
    }
    let amount = parse_positive_amount(sub.get_one::<String>("amount").unwrap())?;
    let supplier = sub
        .get_one::<String>("supplier")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let description = sub.get_one::<String>("description").map(|s| s.to_string());

    conn.execute(
        "INSERT INTO expenses(user_id, date, type, amount, supplier, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user_id,
            date.to_string(),
            typ,
            amount.to_string(),
            supplier,
            description
        ],
    )?;
    println!("Recorded expense of {} on {} ({})", fmt_fcfa(&amount), date, typ);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = require_user(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, user_id, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let mut total = Decimal::ZERO;
        let mut rows = Vec::new();
        for r in &data {
            total += r
                .amount
                .parse::<Decimal>()
                .with_context(|| format!("Invalid amount '{}' in expenses", r.amount))?;
            rows.push(vec![
                r.date.clone(),
                r.r#type.clone(),
                r.supplier.clone(),
                r.amount.clone(),
                r.description.clone(),
            ]);
        }
        println!(
            "{}",
            pretty_table(&["Date", "Type", "Supplier", "Amount", "Description"], rows)
        );
        println!("Total: {}", fmt_fcfa(&total));
    }
    Ok(())
}

#[derive(Serialize)]
pub struct ExpenseRow {
    pub date: String,
    pub r#type: String,
    pub supplier: String,
    pub amount: String,
    pub description: String,
}

pub fn query_rows(
    conn: &Connection,
    user_id: i64,
    sub: &clap::ArgMatches,
) -> Result<Vec<ExpenseRow>> {
    let mut sql = String::from(
        "SELECT date, type, supplier, amount, description FROM expenses WHERE user_id=?",
    );
    let mut params_vec: Vec<String> = vec![user_id.to_string()];

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(date,1,7)=?");
        params_vec.push(parse_month(month)?);
    }
    if let Some(year) = sub.get_one::<String>("year") {
        sql.push_str(" AND substr(date,1,4)=?");
        params_vec.push(parse_year(year)?.to_string());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let date: String = r.get(0)?;
        let typ: String = r.get(1)?;
        let supplier: String = r.get(2)?;
        let amount: String = r.get(3)?;
        let description: Option<String> = r.get(4)?;
        data.push(ExpenseRow {
            date,
            r#type: typ,
            supplier,
            amount,
            description: description.unwrap_or_default(),
        });
    }
    Ok(data)
}
