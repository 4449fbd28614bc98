// Copyright (c) 2025 Caisse contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Revenue types offered by the add form. "Other" is the catch-all.
pub const REVENUE_TYPES: &[&str] = &[
    "Sale",
    "Service",
    "Consultation",
    "Subscription",
    "Commission",
    "Salary",
    "Invoice payment",
    "Maintenance",
    "Donation",
    "Other",
];

pub const EXPENSE_TYPES: &[&str] = &[
    "Transfers",
    "Transport",
    "Food",
    "Bills",
    "Shopping",
    "Health",
    "Leisure",
    "Restaurant",
    "Salaries",
    "Marketing",
    "Rent",
    "Equipment",
    "Maintenance",
    "Tithe",
    "Offering",
    "Internet",
    "Phone credit",
    "Clothing",
    "Other",
];

pub const PROJECT_STATUSES: &[&str] = &["ongoing", "done", "pending", "cancelled"];

pub const LOAN_ACTIVE: &str = "active";
pub const LOAN_SETTLED: &str = "settled";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revenue {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub r#type: String,
    pub client: String,
    pub amount: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub r#type: String,
    pub amount: Decimal,
    pub supplier: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsDeposit {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub amount_deposited: Decimal,
    pub goal: String,
    pub running_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub total_amount: Decimal,
    pub amount_repaid: Decimal,
    pub due_date: NaiveDate,
    pub next_due_date: NaiveDate,
    pub remaining_balance: Decimal,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanPayment {
    pub id: i64,
    pub user_id: i64,
    pub loan_id: i64,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub client: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: String,
    pub estimated_budget: Option<Decimal>,
    pub owner: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub contact: String,
    pub service_type: String,
    pub service_date: Option<NaiveDate>,
    pub amount_paid: Option<Decimal>,
    pub comments: Option<String>,
}
