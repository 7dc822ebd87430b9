// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::require_identity;
use crate::bootstrap::load_overview;
use crate::derived::{ChartView, DashboardView};
use crate::identity::IdentityChannel;
use crate::models::DashboardStats;
use crate::store::{Stores, SyncContext};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use serde_json::json;

fn stats_rows(stats: &DashboardStats) -> Vec<Vec<String>> {
    vec![
        vec!["Balance".into(), format!("{:.2}", stats.balance)],
        vec!["Income".into(), format!("{:.2}", stats.income)],
        vec!["Expenditure".into(), format!("{:.2}", stats.expenditure)],
        vec!["Savings".into(), format!("{:.2}", stats.savings)],
    ]
}

pub fn handle(stores: &Stores, ctx: &SyncContext, sub: &clap::ArgMatches) -> Result<()> {
    require_identity(&stores.transactions)?;
    let dashboard = DashboardView::new(&stores.transactions, &stores.balance);
    let chart = ChartView::new(&stores.transactions, ctx.clock.clone());
    let stats = dashboard.get();
    let series = chart.get();

    let value = json!({ "stats": stats, "chart": series });
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &value)? {
        println!("{}", pretty_table(&["Metric", "Value"], stats_rows(&stats)));
        let rows: Vec<Vec<String>> = series
            .points
            .iter()
            .map(|p| vec![p.label.clone(), format!("{:.2}", p.total)])
            .collect();
        println!("{}", pretty_table(&["Month", "Total"], rows));
    }
    Ok(())
}

pub fn overview(ctx: &SyncContext, sub: &clap::ArgMatches) -> Result<()> {
    let current = ctx.identity.current();
    let overview = load_overview(ctx.remote.as_ref(), current.as_ref())?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &overview)? {
        let mut rows = stats_rows(&overview.stats);
        rows.push(vec![
            "Transactions".into(),
            overview.transactions.len().to_string(),
        ]);
        println!("{}", pretty_table(&["Metric", "Value"], rows));
    }
    Ok(())
}
