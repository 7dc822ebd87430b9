// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::require_identity;
use crate::store::BalanceStore;
use crate::utils::parse_decimal;
use anyhow::{Context, Result};

pub fn handle(store: &BalanceStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            require_identity(store)?;
            println!("{:.2}", store.get());
        }
        Some(("set", sub)) => {
            let amount = parse_decimal(sub.get_one::<String>("amount").context("missing amount")?)?;
            store.set(amount)?;
            println!("Balance set to {:.2}", store.get());
        }
        _ => {}
    }
    Ok(())
}
