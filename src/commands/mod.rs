// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod balance;
pub mod budgets;
pub mod dashboard;
pub mod exporter;
pub mod reminders;
pub mod session;
pub mod transactions;

use crate::store::{LiveStore, Source};
use anyhow::{Result, bail};

/// Fail with a hint when nobody is signed in.
pub fn require_identity<S: Source>(store: &LiveStore<S>) -> Result<()> {
    if store.identity().is_none() {
        bail!("Not signed in; run `budgetsync login <uid>` first");
    }
    Ok(())
}

pub(crate) fn opt_string(m: &clap::ArgMatches, name: &str) -> Option<String> {
    m.get_one::<String>(name).map(|s| s.to_string())
}
