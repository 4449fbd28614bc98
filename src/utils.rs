// Copyright (c) 2025 Caisse contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Duration, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<String> {
    let s = s.trim();
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

pub fn parse_year(s: &str) -> Result<i32> {
    let y: i32 = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid year '{}', expected YYYY", s))?;
    if !(1000..=9999).contains(&y) {
        bail!("Invalid year '{}', expected YYYY", s);
    }
    Ok(y)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid amount '{}'", s))
}

/// The add forms default their date field to today when none is given.
pub fn date_or_today(m: &clap::ArgMatches, key: &str) -> Result<NaiveDate> {
    match m.get_one::<String>(key) {
        Some(s) => parse_date(s),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Form-level validation shared by every add form: amounts must be > 0.
pub fn parse_positive_amount(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d <= Decimal::ZERO {
        bail!("Amount must be greater than 0");
    }
    Ok(d)
}

/// Whole-franc display with thousands separators, e.g. "12,500 FCFA".
pub fn fmt_fcfa(d: &Decimal) -> String {
    let whole = d.round_dp(0).to_string();
    let (sign, digits) = match whole.strip_prefix('-') {
        Some(rest) => ("-", rest.to_string()),
        None => ("", whole),
    };
    let mut out = String::new();
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("{}{} FCFA", sign, out)
}

pub fn month_end(month: &str) -> Result<NaiveDate> {
    let parts: Vec<&str> = month.split('-').collect();
    if parts.len() != 2 {
        return Err(anyhow::anyhow!("Invalid month '{}'", month));
    }
    let y: i32 = parts[0].parse()?;
    let m: u32 = parts[1].parse()?;
    let last_day = match m {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if NaiveDate::from_ymd_opt(y, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        _ => return Err(anyhow::anyhow!("Invalid month number {}", m)),
    };
    NaiveDate::from_ymd_opt(y, m, last_day)
        .ok_or_else(|| anyhow::anyhow!("Invalid month '{}'", month))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Reporting period selected on the dashboard. Weeks run Monday..Sunday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Period {
    Day(NaiveDate),
    Week(NaiveDate),
    Month(String), // YYYY-MM
    Year(i32),
}

impl Period {
    pub fn from_matches(m: &clap::ArgMatches) -> Result<Period> {
        if let Some(d) = m.get_one::<String>("date") {
            return Ok(Period::Day(parse_date(d)?));
        }
        if let Some(d) = m.get_one::<String>("week-of") {
            return Ok(Period::Week(parse_date(d)?));
        }
        if let Some(mo) = m.get_one::<String>("month") {
            return Ok(Period::Month(parse_month(mo)?));
        }
        if let Some(y) = m.get_one::<String>("year") {
            return Ok(Period::Year(parse_year(y)?));
        }
        let today = chrono::Local::now().date_naive();
        Ok(Period::Month(format!("{}", today.format("%Y-%m"))))
    }

    /// Inclusive date bounds of the period.
    pub fn bounds(&self) -> Result<(NaiveDate, NaiveDate)> {
        match self {
            Period::Day(d) => Ok((*d, *d)),
            Period::Week(d) => {
                let monday = *d - Duration::days(d.weekday().num_days_from_monday() as i64);
                Ok((monday, monday + Duration::days(6)))
            }
            Period::Month(m) => {
                let start = parse_date(&format!("{}-01", m))?;
                Ok((start, month_end(m)?))
            }
            Period::Year(y) => {
                let start = NaiveDate::from_ymd_opt(*y, 1, 1)
                    .ok_or_else(|| anyhow::anyhow!("Invalid year {}", y))?;
                let end = NaiveDate::from_ymd_opt(*y, 12, 31)
                    .ok_or_else(|| anyhow::anyhow!("Invalid year {}", y))?;
                Ok((start, end))
            }
        }
    }

    pub fn label(&self) -> String {
        match self {
            Period::Day(d) => d.to_string(),
            Period::Week(d) => {
                let monday = *d - Duration::days(d.weekday().num_days_from_monday() as i64);
                format!("week of {}", monday)
            }
            Period::Month(m) => m.clone(),
            Period::Year(y) => y.to_string(),
        }
    }
}

// Session state lives in the settings table, one key.
const CURRENT_USER_KEY: &str = "current_user";

pub fn set_current_user(conn: &Connection, user_id: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![CURRENT_USER_KEY, user_id.to_string()],
    )?;
    Ok(())
}

pub fn clear_current_user(conn: &Connection) -> Result<()> {
    conn.execute(
        "DELETE FROM settings WHERE key=?1",
        params![CURRENT_USER_KEY],
    )?;
    Ok(())
}

pub fn current_user(conn: &Connection) -> Result<Option<crate::models::User>> {
    let id: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![CURRENT_USER_KEY],
            |r| r.get(0),
        )
        .optional()?;
    let Some(id) = id else {
        return Ok(None);
    };
    let id: i64 = id
        .parse()
        .with_context(|| format!("Corrupt session value '{}'", id))?;
    let user = conn
        .query_row(
            "SELECT id, username, full_name FROM users WHERE id=?1",
            params![id],
            |r| {
                Ok(crate::models::User {
                    id: r.get(0)?,
                    username: r.get(1)?,
                    full_name: r.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}

pub fn require_user(conn: &Connection) -> Result<i64> {
    match current_user(conn)? {
        Some(u) => Ok(u.id),
        None => bail!("Not logged in. Run 'caisse auth login' first"),
    }
}

pub fn id_for_loan(conn: &Connection, user_id: i64, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM loans WHERE user_id=?1 AND name=?2")?;
    let id: i64 = stmt
        .query_row(params![user_id, name], |r| r.get(0))
        .with_context(|| format!("Loan '{}' not found", name))?;
    Ok(id)
}
