// Copyright (c) 2025 Caisse contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = collect_issues(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Read-only consistency checks over every user's records. Stored running
/// balances and loan fields are denormalized, so edits made outside the add
/// forms (or deposits recorded out of date order) show up here.
pub fn collect_issues(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut issues = Vec::new();

    // 1) Savings: stored running_balance vs the cumulative total recomputed
    //    over the same date ordering the balance reads use.
    let mut users_stmt = conn.prepare("SELECT id, username FROM users ORDER BY id")?;
    let users = users_stmt.query_map([], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?)))?;
    for u in users {
        let (user_id, username) = u?;
        let mut stmt = conn.prepare(
            "SELECT date, amount_deposited, running_balance FROM savings
             WHERE user_id=?1 ORDER BY date, id",
        )?;
        let mut rows = stmt.query(params![user_id])?;
        let mut expected = Decimal::ZERO;
        while let Some(r) = rows.next()? {
            let date: String = r.get(0)?;
            let dep_s: String = r.get(1)?;
            let bal_s: String = r.get(2)?;
            let dep = dep_s
                .parse::<Decimal>()
                .with_context(|| format!("Invalid deposit '{}' in savings", dep_s))?;
            let stored = bal_s
                .parse::<Decimal>()
                .with_context(|| format!("Invalid running balance '{}' in savings", bal_s))?;
            expected += dep;
            if stored != expected {
                issues.push(vec![
                    "savings_balance_drift".into(),
                    format!("{}: {} stored {} expected {}", username, date, stored, expected),
                ]);
            }
        }
    }

    // 2) Loans: remaining must equal total - repaid, and status must agree
    //    with remaining.
    let mut stmt = conn.prepare(
        "SELECT u.username, l.name, l.total_amount, l.amount_repaid,
                l.remaining_balance, l.status
         FROM loans l JOIN users u ON l.user_id=u.id ORDER BY u.id, l.name",
    )?;
    let mut rows = stmt.query([])?;
    while let Some(r) = rows.next()? {
        let username: String = r.get(0)?;
        let name: String = r.get(1)?;
        let total_s: String = r.get(2)?;
        let repaid_s: String = r.get(3)?;
        let remaining_s: String = r.get(4)?;
        let status: String = r.get(5)?;
        let total = total_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid total '{}' for loan '{}'", total_s, name))?;
        let repaid = repaid_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid repaid '{}' for loan '{}'", repaid_s, name))?;
        let remaining = remaining_s.parse::<Decimal>().with_context(|| {
            format!("Invalid remaining '{}' for loan '{}'", remaining_s, name)
        })?;
        if total - repaid != remaining {
            issues.push(vec![
                "loan_balance_mismatch".into(),
                format!(
                    "{}: '{}' total {} - repaid {} != remaining {}",
                    username, name, total, repaid, remaining
                ),
            ]);
        }
        let should_be_settled = remaining <= Decimal::ZERO;
        if should_be_settled != (status == "settled") {
            issues.push(vec![
                "loan_status_mismatch".into(),
                format!("{}: '{}' remaining {} but status {}", username, name, remaining, status),
            ]);
        }
    }

    Ok(issues)
}
