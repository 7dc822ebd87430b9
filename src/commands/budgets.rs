// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{opt_string, require_identity};
use crate::models::{BudgetPatch, NewBudget};
use crate::store::BudgetStore;
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;

pub fn handle(store: &BudgetStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("update", sub)) => update(store, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn opt_decimal(sub: &clap::ArgMatches, name: &str) -> Result<Option<Decimal>> {
    match sub.get_one::<String>(name) {
        Some(s) => Ok(Some(parse_decimal(s)?)),
        None => Ok(None),
    }
}

fn add(store: &BudgetStore, sub: &clap::ArgMatches) -> Result<()> {
    let budget = NewBudget {
        category: opt_string(sub, "category").context("missing --category")?,
        amount: opt_decimal(sub, "amount")?.context("missing --amount")?,
        spent: opt_decimal(sub, "spent")?.unwrap_or(Decimal::ZERO),
        start_date: opt_string(sub, "start").context("missing --start")?,
        end_date: opt_string(sub, "end").context("missing --end")?,
    };
    let label = format!("{} {} ({} .. {})", budget.category, budget.amount, budget.start_date, budget.end_date);
    let id = store.add(budget)?;
    println!("Budget added: {} [{}]", label, id);
    Ok(())
}

fn update(store: &BudgetStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = opt_string(sub, "id").context("missing id")?;
    let patch = BudgetPatch {
        category: opt_string(sub, "category"),
        amount: opt_decimal(sub, "amount")?,
        spent: opt_decimal(sub, "spent")?,
        start_date: opt_string(sub, "start"),
        end_date: opt_string(sub, "end"),
    };
    if patch.is_empty() {
        bail!("Nothing to update; pass at least one of --category --amount --spent --start --end");
    }
    store.update(&id, patch)?;
    println!("Budget {} updated", id);
    Ok(())
}

fn remove(store: &BudgetStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = opt_string(sub, "id").context("missing id")?;
    store.remove(&id)?;
    println!("Removed budget {}", id);
    Ok(())
}

fn list(store: &BudgetStore, sub: &clap::ArgMatches) -> Result<()> {
    require_identity(store)?;
    let data = store.get();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|b| {
                vec![
                    b.category.clone(),
                    format!("{:.2}", b.amount),
                    format!("{:.2}", b.spent),
                    b.start_date.clone(),
                    b.end_date.clone(),
                    b.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Budget", "Spent", "Start", "End", "Id"], rows)
        );
    }
    Ok(())
}
