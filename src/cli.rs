// Copyright (c) 2025 Caisse contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};

fn with_output_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn date_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).value_name("YYYY-MM-DD").help(help)
}

pub fn build_cli() -> Command {
    Command::new("caisse")
        .about("FCFA income, expense, savings, and loan tracker")
        .version(clap::crate_version!())
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Create the database and print its location"))
        .subcommand(
            Command::new("auth")
                .about("Register, log in, and inspect the current session")
                .subcommand(
                    Command::new("register")
                        .about("Create a user account and log in")
                        .arg(Arg::new("username").long("username").required(true))
                        .arg(Arg::new("password").long("password").required(true))
                        .arg(Arg::new("full-name").long("full-name").required(true)),
                )
                .subcommand(
                    Command::new("login")
                        .about("Log in as an existing user")
                        .arg(Arg::new("username").long("username").required(true))
                        .arg(Arg::new("password").long("password").required(true)),
                )
                .subcommand(Command::new("logout").about("Clear the current session"))
                .subcommand(Command::new("whoami").about("Show the logged-in user")),
        )
        .subcommand(
            Command::new("revenue")
                .about("Record and list income")
                .subcommand(
                    Command::new("add")
                        .arg(date_arg("date", "Revenue date (default: today)"))
                        .arg(Arg::new("type").long("type").required(true))
                        .arg(Arg::new("client").long("client"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(with_output_flags(
                    Command::new("list")
                        .arg(Arg::new("month").long("month").value_name("YYYY-MM"))
                        .arg(Arg::new("year").long("year").value_name("YYYY"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("expense")
                .about("Record and list spending")
                .subcommand(
                    Command::new("add")
                        .arg(date_arg("date", "Expense date (default: today)"))
                        .arg(Arg::new("type").long("type").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("supplier").long("supplier"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(with_output_flags(
                    Command::new("list")
                        .arg(Arg::new("month").long("month").value_name("YYYY-MM"))
                        .arg(Arg::new("year").long("year").value_name("YYYY"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("savings")
                .about("Deposit into savings and track the balance")
                .subcommand(
                    Command::new("deposit")
                        .arg(date_arg("date", "Deposit date (default: today)"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("goal").long("goal").help("What you are saving for")),
                )
                .subcommand(with_output_flags(
                    Command::new("status").about("Balance, total deposited, and history"),
                )),
        )
        .subcommand(
            Command::new("loan")
                .about("Track loans and repayments")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("total").long("total").required(true))
                        .arg(
                            date_arg("due-date", "Final due date")
                                .required(true),
                        )
                        .arg(
                            date_arg("next-due-date", "Next installment date")
                                .required(true),
                        ),
                )
                .subcommand(
                    Command::new("repay")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(date_arg("date", "Repayment date (default: today)"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(with_output_flags(Command::new("list").arg(
                    Arg::new("all").long("all").action(ArgAction::SetTrue).help(
                        "Include settled loans",
                    ),
                )))
                .subcommand(with_output_flags(
                    Command::new("payments")
                        .about("Repayment history for one loan")
                        .arg(Arg::new("name").long("name").required(true)),
                )),
        )
        .subcommand(
            Command::new("project")
                .about("Track projects")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("client").long("client"))
                        .arg(date_arg("start-date", "Start date (default: today)"))
                        .arg(date_arg("end-date", "Planned end date"))
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .default_value("ongoing")
                                .help("ongoing|done|pending|cancelled"),
                        )
                        .arg(Arg::new("budget").long("budget"))
                        .arg(Arg::new("owner").long("owner")),
                )
                .subcommand(
                    Command::new("set-status")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("status").long("status").required(true)),
                )
                .subcommand(with_output_flags(
                    Command::new("list").arg(Arg::new("status").long("status")),
                )),
        )
        .subcommand(
            Command::new("client")
                .about("Track clients")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("contact").long("contact"))
                        .arg(Arg::new("service-type").long("service-type"))
                        .arg(date_arg("service-date", "Date of service"))
                        .arg(Arg::new("amount-paid").long("amount-paid"))
                        .arg(Arg::new("comments").long("comments")),
                )
                .subcommand(with_output_flags(Command::new("list"))),
        )
        .subcommand(with_output_flags(
            Command::new("dashboard")
                .about("Totals and expense breakdown for a period (default: current month)")
                .arg(date_arg("date", "Single day"))
                .arg(date_arg("week-of", "Monday..Sunday week containing this date"))
                .arg(Arg::new("month").long("month").value_name("YYYY-MM"))
                .arg(Arg::new("year").long("year").value_name("YYYY"))
                .group(ArgGroup::new("period").args(["date", "week-of", "month", "year"])),
        ))
        .subcommand(
            Command::new("export")
                .about("Export your records to CSV or JSON")
                .subcommand(
                    Command::new("revenues")
                        .arg(Arg::new("format").long("format").required(true))
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("expenses")
                        .arg(Arg::new("format").long("format").required(true))
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("doctor")
                .about("Check stored balances against recomputed history"),
        )
}
