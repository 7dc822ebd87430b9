// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::require_identity;
use crate::store::TransactionStore;
use anyhow::{Context, Result, bail};
use serde_json::json;

pub fn handle(store: &TransactionStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, sub),
        _ => Ok(()),
    }
}

fn export_transactions(store: &TransactionStore, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .context("missing --format")?
        .to_lowercase();
    let out = sub.get_one::<String>("out").context("missing --out")?;
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }
    require_identity(store)?;

    let rows = store.get();
    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "date", "description", "amount", "category", "type"])?;
            for t in &rows {
                wtr.write_record([
                    t.id.as_str(),
                    t.date.as_str(),
                    t.description.as_str(),
                    &t.amount.to_string(),
                    t.category.as_str(),
                    t.r#type.as_str(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let items: Vec<_> = rows
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id, "date": t.date, "description": t.description,
                        "amount": t.amount.to_string(), "category": t.category, "type": t.r#type
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
    }
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}
