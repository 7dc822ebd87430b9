// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn output_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn required(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn optional(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

pub fn build_cli() -> Command {
    Command::new("budgetsync")
        .version(clap::crate_version!())
        .about("Live-synced transactions, budgets and reminders for the signed-in user")
        .subcommand(Command::new("init").about("Create the local document database"))
        .subcommand(
            Command::new("login")
                .about("Sign in as a user id")
                .arg(Arg::new("uid").required(true))
                .arg(optional("email", "Email to remember with the session")),
        )
        .subcommand(Command::new("logout").about("Sign out"))
        .subcommand(Command::new("whoami").about("Show the signed-in user"))
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .arg(required("date", "YYYY-MM-DD"))
                        .arg(required("amount", "Amount, e.g. 120.50"))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .value_parser(["income", "expenditure"]),
                        )
                        .arg(required("description", "What it was"))
                        .arg(required("category", "Category name")),
                )
                .subcommand(output_flags(
                    Command::new("list").arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize)),
                    ),
                )),
        )
        .subcommand(
            Command::new("budget")
                .about("Budgets")
                .subcommand(
                    Command::new("add")
                        .arg(required("category", "Category name"))
                        .arg(required("amount", "Target amount"))
                        .arg(optional("spent", "Already spent (default 0)"))
                        .arg(required("start", "YYYY-MM-DD"))
                        .arg(required("end", "YYYY-MM-DD")),
                )
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("id").required(true))
                        .arg(optional("category", "Category name"))
                        .arg(optional("amount", "Target amount"))
                        .arg(optional("spent", "Already spent"))
                        .arg(optional("start", "YYYY-MM-DD"))
                        .arg(optional("end", "YYYY-MM-DD")),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true)))
                .subcommand(output_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("reminder")
                .about("Reminders")
                .subcommand(
                    Command::new("add")
                        .arg(required("title", "Title"))
                        .arg(optional("subtitle", "Subtitle"))
                        .arg(
                            Arg::new("highlight")
                                .long("highlight")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(optional("amount", "Amount"))
                        .arg(optional("description", "Description"))
                        .arg(optional("category", "Category name"))
                        .arg(optional("due", "Due date, YYYY-MM-DD"))
                        .arg(optional("icon", "Icon name"))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["income", "expenditure"]),
                        ),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true)))
                .subcommand(output_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("balance")
                .about("Account balance")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("set").arg(Arg::new("amount").required(true))),
        )
        .subcommand(output_flags(
            Command::new("dashboard").about("Totals and the six-month spending chart"),
        ))
        .subcommand(output_flags(
            Command::new("overview").about("Stored overview stats (one-shot read)"),
        ))
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .arg(required("format", "csv|json"))
                    .arg(required("out", "Output file")),
            ),
        )
}
