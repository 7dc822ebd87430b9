// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::sync::Arc;

use budgetsync::config::Config;
use budgetsync::identity::{LocalIdentityChannel, SessionFile};
use budgetsync::{Stores, SyncContext, cli, commands, db};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let config = Config::load()?;
    let remote = Arc::new(db::open_or_init(&config)?);
    let channel = LocalIdentityChannel::persistent(SessionFile::new(config.session_path()))?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", config.db_path().display());
            return Ok(());
        }
        Some(("login", sub)) => return commands::session::login(&channel, sub),
        Some(("logout", _)) => return commands::session::logout(&channel),
        Some(("whoami", _)) => {
            commands::session::whoami(&channel);
            return Ok(());
        }
        None => {
            cli::build_cli().print_help()?;
            println!();
            return Ok(());
        }
        _ => {}
    }

    let ctx = SyncContext::new(Arc::new(channel), remote);
    let stores = Stores::connect(&ctx);

    match matches.subcommand() {
        Some(("tx", sub)) => commands::transactions::handle(&stores.transactions, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&stores.budgets, sub)?,
        Some(("reminder", sub)) => commands::reminders::handle(&stores.reminders, sub)?,
        Some(("balance", sub)) => commands::balance::handle(&stores.balance, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&stores, &ctx, sub)?,
        Some(("overview", sub)) => commands::dashboard::overview(&ctx, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&stores.transactions, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
