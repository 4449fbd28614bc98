// Copyright (c) 2025 Caisse contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::PROJECT_STATUSES;
use crate::utils::{
    date_or_today, maybe_print_json, parse_date, parse_positive_amount, pretty_table, require_user,
};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("set-status", sub)) => set_status(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn check_status(status: &str) -> Result<()> {
    if !PROJECT_STATUSES.contains(&status) {
        bail!(
            "Unknown project status '{}'. Expected one of: {}",
            status,
            PROJECT_STATUSES.join(", ")
        );
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = require_user(conn)?;
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    if name.is_empty() {
        bail!("Project name must not be empty");
    }
    let client = sub
        .get_one::<String>("client")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let start_date = date_or_today(sub, "start-date")?;
    let end_date = sub
        .get_one::<String>("end-date")
        .map(|s| parse_date(s))
        .transpose()?;
    let status = sub.get_one::<String>("status").unwrap().trim().to_string();
    check_status(&status)?;
    let budget = sub
        .get_one::<String>("budget")
        .map(|s| parse_positive_amount(s))
        .transpose()?;
    let owner = sub
        .get_one::<String>("owner")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    match conn.execute(
        "INSERT INTO projects(user_id, name, client, start_date, end_date, status,
                              estimated_budget, owner)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            user_id,
            name,
            client,
            start_date.to_string(),
            end_date.map(|d| d.to_string()),
            status,
            budget.map(|b| b.to_string()),
            owner
        ],
    ) {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            bail!("Project '{}' already exists", name);
        }
        Err(e) => return Err(e.into()),
    }
    println!("Added project '{}' ({})", name, status);
    Ok(())
}

fn set_status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = require_user(conn)?;
    let name = sub.get_one::<String>("name").unwrap().trim();
    let status = sub.get_one::<String>("status").unwrap().trim();
    check_status(status)?;
    let changed = conn.execute(
        "UPDATE projects SET status=?1 WHERE user_id=?2 AND name=?3",
        params![status, user_id, name],
    )?;
    if changed == 0 {
        bail!("Project '{}' not found", name);
    }
    println!("Project '{}' is now {}", name, status);
    Ok(())
}

#[derive(Serialize)]
pub struct ProjectRow {
    pub name: String,
    pub client: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub estimated_budget: String,
    pub owner: String,
}

pub fn query_rows(
    conn: &Connection,
    user_id: i64,
    status: Option<&str>,
) -> Result<Vec<ProjectRow>> {
    let mut sql = String::from(
        "SELECT name, client, start_date, end_date, status, estimated_budget, owner
         FROM projects WHERE user_id=?",
    );
    let mut params_vec: Vec<String> = vec![user_id.to_string()];
    if let Some(s) = status {
        sql.push_str(" AND status=?");
        params_vec.push(s.to_string());
    }
    sql.push_str(" ORDER BY start_date DESC, id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let end_date: Option<String> = r.get(3)?;
        let budget: Option<String> = r.get(5)?;
        data.push(ProjectRow {
            name: r.get(0)?,
            client: r.get(1)?,
            start_date: r.get(2)?,
            end_date: end_date.unwrap_or_default(),
            status: r.get(4)?,
            estimated_budget: budget.unwrap_or_default(),
            owner: r.get(6)?,
        });
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = require_user(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let status = sub.get_one::<String>("status").map(|s| s.trim().to_string());
    if let Some(ref s) = status {
        check_status(s)?;
    }
    let data = query_rows(conn, user_id, status.as_deref())?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    r.name,
                    r.client,
                    r.start_date,
                    r.end_date,
                    r.status,
                    r.estimated_budget,
                    r.owner,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Name", "Client", "Start", "End", "Status", "Budget", "Owner"],
                rows,
            )
        );
    }
    Ok(())
}
