// Copyright (c) 2025 Caisse contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::savings;
use crate::utils::{Period, fmt_fcfa, maybe_print_json, pretty_table, require_user};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let user_id = require_user(conn)?;
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let period = Period::from_matches(m)?;
    let summary = summarize(conn, user_id, &period)?;

    if !maybe_print_json(json_flag, jsonl_flag, &summary)? {
        println!("Period: {}", summary.period);
        let revenues: Decimal = summary.revenues.parse()?;
        let expenses: Decimal = summary.expenses.parse()?;
        let balance: Decimal = summary.balance.parse()?;
        let savings: Decimal = summary.savings.parse()?;
        println!(
            "{}",
            pretty_table(
                &["Metric", "Amount"],
                vec![
                    vec!["Revenues".into(), fmt_fcfa(&revenues)],
                    vec!["Expenses".into(), fmt_fcfa(&expenses)],
                    vec!["Balance".into(), fmt_fcfa(&balance)],
                    vec!["Savings".into(), fmt_fcfa(&savings)],
                ],
            )
        );
        if summary.categories.is_empty() {
            println!("No expenses for this period");
        } else {
            let mut rows = Vec::new();
            for c in summary.categories {
                let amt: Decimal = c
                    .amount
                    .parse()
                    .with_context(|| format!("Invalid amount '{}' in breakdown", c.amount))?;
                rows.push(vec![c.category, fmt_fcfa(&amt), c.percent]);
            }
            println!("{}", pretty_table(&["Category", "Spent", "Share"], rows));
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct CategoryLine {
    pub category: String,
    pub amount: String,
    pub percent: String,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub period: String,
    pub revenues: String,
    pub expenses: String,
    pub balance: String,
    pub savings: String,
    pub categories: Vec<CategoryLine>,
}

pub fn summarize(conn: &Connection, user_id: i64, period: &Period) -> Result<Summary> {
    let (from, to) = period.bounds()?;
    let revenues = sum_amounts(conn, "revenues", user_id, from, to)?;
    let expenses = sum_amounts(conn, "expenses", user_id, from, to)?;
    let cats = expenses_by_category(conn, user_id, from, to)?;

    let categories = cats
        .into_iter()
        .map(|(category, amount)| {
            let percent = if expenses > Decimal::ZERO {
                amount / expenses * Decimal::from(100)
            } else {
                Decimal::ZERO
            };
            CategoryLine {
                category,
                amount: amount.to_string(),
                percent: format!("{:.0}%", percent),
            }
        })
        .collect();

    Ok(Summary {
        period: period.label(),
        revenues: revenues.to_string(),
        expenses: expenses.to_string(),
        balance: (revenues - expenses).to_string(),
        savings: savings::balance(conn, user_id)?.to_string(),
        categories,
    })
}

fn sum_amounts(
    conn: &Connection,
    table: &str,
    user_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Decimal> {
    // Amounts are TEXT; summing parsed decimals avoids float drift.
    let sql = format!(
        "SELECT amount FROM {} WHERE user_id=?1 AND date>=?2 AND date<=?3",
        table
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![user_id, from.to_string(), to.to_string()])?;
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let s: String = r.get(0)?;
        total += s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid amount '{}' in {}", s, table))?;
    }
    Ok(total)
}

pub fn period_totals(
    conn: &Connection,
    user_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<(Decimal, Decimal)> {
    Ok((
        sum_amounts(conn, "revenues", user_id, from, to)?,
        sum_amounts(conn, "expenses", user_id, from, to)?,
    ))
}

/// Group-by-sum of expenses over the period, largest first. This is the
/// category breakdown behind the donut chart and the category list.
pub fn expenses_by_category(
    conn: &Connection,
    user_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<(String, Decimal)>> {
    let mut stmt = conn.prepare(
        "SELECT type, amount FROM expenses WHERE user_id=?1 AND date>=?2 AND date<=?3",
    )?;
    let mut rows = stmt.query(params![user_id, from.to_string(), to.to_string()])?;
    use std::collections::HashMap;
    let mut agg: HashMap<String, Decimal> = HashMap::new();
    while let Some(r) = rows.next()? {
        let typ: String = r.get(0)?;
        let s: String = r.get(1)?;
        let amt = s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid amount '{}' in expenses", s))?;
        *agg.entry(typ).or_insert(Decimal::ZERO) += amt;
    }
    let mut items: Vec<_> = agg.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    Ok(items)
}
