// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{opt_string, require_identity};
use crate::models::{NewReminder, TxType};
use crate::store::{ReminderStore, SENTINEL_ID};
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Context, Result, anyhow};

pub fn handle(store: &ReminderStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &ReminderStore, sub: &clap::ArgMatches) -> Result<()> {
    let amount = match sub.get_one::<String>("amount") {
        Some(s) => Some(parse_decimal(s)?),
        None => None,
    };
    let kind = match sub.get_one::<String>("type") {
        Some(s) => Some(s.parse::<TxType>().map_err(|e| anyhow!(e))?),
        None => None,
    };
    let reminder = NewReminder {
        title: opt_string(sub, "title").context("missing --title")?,
        subtitle: opt_string(sub, "subtitle"),
        highlight: sub.get_flag("highlight"),
        is_ai: false,
        amount,
        description: opt_string(sub, "description"),
        category: opt_string(sub, "category"),
        due_date: opt_string(sub, "due"),
        icon: opt_string(sub, "icon"),
        r#type: kind,
    };
    let title = reminder.title.clone();
    let id = store.add(reminder)?;
    println!("Reminder '{}' added [{}]", title, id);
    Ok(())
}

fn remove(store: &ReminderStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = opt_string(sub, "id").context("missing id")?;
    if id == SENTINEL_ID {
        println!("The assistant reminder cannot be removed");
        return Ok(());
    }
    store.remove(&id)?;
    println!("Removed reminder {}", id);
    Ok(())
}

fn list(store: &ReminderStore, sub: &clap::ArgMatches) -> Result<()> {
    require_identity(store)?;
    let data = store.get();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    if r.highlight { format!("* {}", r.title) } else { r.title.clone() },
                    r.subtitle.clone().unwrap_or_default(),
                    r.due_date.clone().unwrap_or_default(),
                    r.amount.map(|a| format!("{:.2}", a)).unwrap_or_default(),
                    r.r#type.map(|t| t.to_string()).unwrap_or_default(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Title", "Subtitle", "Due", "Amount", "Type", "Id"], rows)
        );
    }
    Ok(())
}
