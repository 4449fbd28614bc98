// Copyright (c) 2025 Caisse contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    date_or_today, fmt_fcfa, maybe_print_json, parse_positive_amount, pretty_table, require_user,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("deposit", sub)) => {
            let user_id = require_user(conn)?;
            let date = date_or_today(sub, "date")?;
            let amount = parse_positive_amount(sub.get_one::<String>("amount").unwrap())?;
            let goal = sub
                .get_one::<String>("goal")
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
            let new_balance = deposit(conn, user_id, date, amount, &goal)?;
            println!(
                "Deposited {}. New balance: {}",
                fmt_fcfa(&amount),
                fmt_fcfa(&new_balance)
            );
        }
        Some(("status", sub)) => status(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Current balance, read from the most recent deposit's stored running total.
/// Zero when no deposits exist.
pub fn balance(conn: &Connection, user_id: i64) -> Result<Decimal> {
    let v: Option<String> = conn
        .query_row(
            "SELECT running_balance FROM savings WHERE user_id=?1
             ORDER BY date DESC, id DESC LIMIT 1",
            params![user_id],
            |r| r.get(0),
        )
        .optional()?;
    match v {
        Some(s) => s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid running balance '{}' in savings", s)),
        None => Ok(Decimal::ZERO),
    }
}

/// Appends a deposit row carrying the new running balance and returns it.
pub fn deposit(
    conn: &Connection,
    user_id: i64,
    date: NaiveDate,
    amount: Decimal,
    goal: &str,
) -> Result<Decimal> {
    let new_balance = balance(conn, user_id)? + amount;
    conn.execute(
        "INSERT INTO savings(user_id, date, amount_deposited, goal, running_balance)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user_id,
            date.to_string(),
            amount.to_string(),
            goal,
            new_balance.to_string()
        ],
    )?;
    Ok(new_balance)
}

#[derive(Serialize)]
pub struct DepositRow {
    pub date: String,
    pub amount_deposited: String,
    pub goal: String,
    pub running_balance: String,
}

pub fn query_rows(conn: &Connection, user_id: i64) -> Result<Vec<DepositRow>> {
    let mut stmt = conn.prepare(
        "SELECT date, amount_deposited, goal, running_balance FROM savings
         WHERE user_id=?1 ORDER BY date DESC, id DESC",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(DepositRow {
            date: r.get(0)?,
            amount_deposited: r.get(1)?,
            goal: r.get(2)?,
            running_balance: r.get(3)?,
        });
    }
    Ok(data)
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = require_user(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, user_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let mut total_deposited = Decimal::ZERO;
        for r in &data {
            total_deposited += r
                .amount_deposited
                .parse::<Decimal>()
                .with_context(|| format!("Invalid amount '{}' in savings", r.amount_deposited))?;
        }
        println!("Balance:         {}", fmt_fcfa(&balance(conn, user_id)?));
        println!("Total deposited: {}", fmt_fcfa(&total_deposited));
        let rows = data
            .into_iter()
            .map(|r| vec![r.date, r.amount_deposited, r.goal, r.running_balance])
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Deposited", "Goal", "Balance"], rows)
        );
    }
    Ok(())
}
