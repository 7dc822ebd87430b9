// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::require_identity;
use crate::models::{NewTransaction, Transaction, TxType};
use crate::store::TransactionStore;
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Context, Result, anyhow};

pub fn handle(store: &TransactionStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn arg<'a>(sub: &'a clap::ArgMatches, name: &str) -> Result<&'a String> {
    sub.get_one::<String>(name)
        .with_context(|| format!("missing --{}", name))
}

fn add(store: &TransactionStore, sub: &clap::ArgMatches) -> Result<()> {
    let date = arg(sub, "date")?.to_string();
    let amount = parse_decimal(arg(sub, "amount")?)?;
    let kind: TxType = arg(sub, "type")?.parse().map_err(|e: String| anyhow!(e))?;
    let tx = NewTransaction {
        date: date.clone(),
        description: arg(sub, "description")?.to_string(),
        amount,
        category: arg(sub, "category")?.to_string(),
        r#type: kind,
    };
    let id = store.add(tx)?;
    println!("Recorded {} {} on {} ({})", kind, amount, date, id);
    Ok(())
}

fn list(store: &TransactionStore, sub: &clap::ArgMatches) -> Result<()> {
    require_identity(store)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = rows(store, sub);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.date.clone(),
                    t.description.clone(),
                    format!("{:.2}", t.amount),
                    t.r#type.to_string(),
                    t.category.clone(),
                    t.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Description", "Amount", "Type", "Category", "Id"],
                rows,
            )
        );
    }
    Ok(())
}

/// The live snapshot, newest first, cut to `--limit`.
pub fn rows(store: &TransactionStore, sub: &clap::ArgMatches) -> Vec<Transaction> {
    let mut data = store.get();
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    data
}
