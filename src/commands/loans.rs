// Copyright (c) 2025 Caisse contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{LOAN_ACTIVE, LOAN_SETTLED};
use crate::utils::{
    date_or_today, fmt_fcfa, id_for_loan, maybe_print_json, parse_date, parse_positive_amount,
    pretty_table, require_user,
};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("repay", sub)) => {
            let user_id = require_user(conn)?;
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            let amount = parse_positive_amount(sub.get_one::<String>("amount").unwrap())?;
            let date = date_or_today(sub, "date")?;
            let note = sub.get_one::<String>("note").map(|s| s.to_string());
            let outcome = repay(conn, user_id, &name, amount, date, note.as_deref())?;
            if outcome.settled {
                println!("Loan '{}' fully repaid. Congratulations!", name);
            } else {
                println!(
                    "Repaid {} on '{}'. Remaining: {}",
                    fmt_fcfa(&amount),
                    name,
                    fmt_fcfa(&outcome.remaining)
                );
            }
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("payments", sub)) => payments(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = require_user(conn)?;
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    if name.is_empty() {
        bail!("Loan name must not be empty");
    }
    let total = parse_positive_amount(sub.get_one::<String>("total").unwrap())?;
    let due_date = parse_date(sub.get_one::<String>("due-date").unwrap())?;
    let next_due = parse_date(sub.get_one::<String>("next-due-date").unwrap())?;

    match conn.execute(
        "INSERT INTO loans(user_id, name, total_amount, amount_repaid, due_date,
                           next_due_date, remaining_balance, status)
         VALUES (?1, ?2, ?3, '0', ?4, ?5, ?3, ?6)",
        params![
            user_id,
            name,
            total.to_string(),
            due_date.to_string(),
            next_due.to_string(),
            LOAN_ACTIVE
        ],
    ) {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            bail!("Loan '{}' already exists", name);
        }
        Err(e) => return Err(e.into()),
    }
    println!("Added loan '{}' for {}", name, fmt_fcfa(&total));
    Ok(())
}

#[derive(Debug)]
pub struct RepayOutcome {
    pub remaining: Decimal,
    pub settled: bool,
}

/// Records one repayment: inserts the payment row and updates the loan's
/// repaid/remaining amounts in a single transaction. Flips the loan to
/// settled when nothing remains.
pub fn repay(
    conn: &mut Connection,
    user_id: i64,
    name: &str,
    amount: Decimal,
    date: NaiveDate,
    note: Option<&str>,
) -> Result<RepayOutcome> {
    let tx = conn.transaction()?;

    let row: Option<(i64, String, String)> = tx
        .query_row(
            "SELECT id, amount_repaid, remaining_balance FROM loans
             WHERE user_id=?1 AND name=?2 AND status=?3",
            params![user_id, name, LOAN_ACTIVE],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .optional()?;
    let Some((loan_id, repaid_s, remaining_s)) = row else {
        bail!("Active loan '{}' not found", name);
    };
    let repaid = repaid_s
        .parse::<Decimal>()
        .with_context(|| format!("Invalid repaid amount '{}' for loan '{}'", repaid_s, name))?;
    let remaining = remaining_s.parse::<Decimal>().with_context(|| {
        format!("Invalid remaining balance '{}' for loan '{}'", remaining_s, name)
    })?;
    if amount > remaining {
        bail!(
            "Repayment {} exceeds remaining balance {}",
            fmt_fcfa(&amount),
            fmt_fcfa(&remaining)
        );
    }

    let new_repaid = repaid + amount;
    let new_remaining = remaining - amount;
    let settled = new_remaining <= Decimal::ZERO;
    let status = if settled { LOAN_SETTLED } else { LOAN_ACTIVE };

    tx.execute(
        "INSERT INTO loan_payments(user_id, loan_id, amount, date, note)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![user_id, loan_id, amount.to_string(), date.to_string(), note],
    )?;
    tx.execute(
        "UPDATE loans SET amount_repaid=?1, remaining_balance=?2, status=?3 WHERE id=?4",
        params![new_repaid.to_string(), new_remaining.to_string(), status, loan_id],
    )?;
    tx.commit()?;

    Ok(RepayOutcome {
        remaining: new_remaining,
        settled,
    })
}

#[derive(Serialize)]
pub struct LoanRow {
    pub name: String,
    pub total: String,
    pub repaid: String,
    pub remaining: String,
    pub progress: String,
    pub due_date: String,
    pub next_due_date: String,
    pub status: String,
}

pub fn query_rows(conn: &Connection, user_id: i64, include_settled: bool) -> Result<Vec<LoanRow>> {
    let mut sql = String::from(
        "SELECT name, total_amount, amount_repaid, remaining_balance,
                due_date, next_due_date, status
         FROM loans WHERE user_id=?1",
    );
    if !include_settled {
        sql.push_str(" AND status=?2");
    }
    sql.push_str(" ORDER BY name");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if include_settled {
        stmt.query(params![user_id])?
    } else {
        stmt.query(params![user_id, LOAN_ACTIVE])?
    };
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let name: String = r.get(0)?;
        let total_s: String = r.get(1)?;
        let repaid_s: String = r.get(2)?;
        let total = total_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid total '{}' for loan '{}'", total_s, name))?;
        let repaid = repaid_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid repaid '{}' for loan '{}'", repaid_s, name))?;
        let progress = if total > Decimal::ZERO {
            repaid / total * Decimal::from(100)
        } else {
            Decimal::ZERO
        };
        data.push(LoanRow {
            name,
            total: total_s,
            repaid: repaid_s,
            remaining: r.get(3)?,
            progress: format!("{:.1}%", progress),
            due_date: r.get(4)?,
            next_due_date: r.get(5)?,
            status: r.get(6)?,
        });
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = require_user(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, user_id, sub.get_flag("all"))?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    r.name,
                    r.total,
                    r.repaid,
                    r.remaining,
                    r.progress,
                    r.due_date,
                    r.next_due_date,
                    r.status,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Name", "Total", "Repaid", "Remaining", "Progress", "Due", "Next due", "Status"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct PaymentRow {
    pub date: String,
    pub amount: String,
    pub note: String,
}

fn payments(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = require_user(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let name = sub.get_one::<String>("name").unwrap().trim();
    let loan_id = id_for_loan(conn, user_id, name)?;

    let mut stmt = conn.prepare(
        "SELECT date, amount, note FROM loan_payments
         WHERE loan_id=?1 ORDER BY date DESC, id DESC",
    )?;
    let mut rows = stmt.query(params![loan_id])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let note: Option<String> = r.get(2)?;
        data.push(PaymentRow {
            date: r.get(0)?,
            amount: r.get(1)?,
            note: note.unwrap_or_default(),
        });
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .into_iter()
            .map(|r| vec![r.date, r.amount, r.note])
            .collect();
        println!("{}", pretty_table(&["Date", "Amount", "Note"], rows));
    }
    Ok(())
}
