// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Views recomputed from the live stores on every input change.

use crate::listener::ListenerHandle;
use crate::models::{ChartSeries, DashboardStats, MonthTotal, Transaction, TxType};
use crate::signal::Signal;
use crate::store::{BalanceStore, TransactionStore};
use crate::utils::{month_start, same_month};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Number of months in the spending chart, current month included.
pub const CHART_MONTHS: i32 = 6;

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub fn dashboard_stats(transactions: &[Transaction], balance: Decimal) -> DashboardStats {
    let mut income = Decimal::ZERO;
    let mut expenditure = Decimal::ZERO;
    for tx in transactions {
        match tx.r#type {
            TxType::Income => income += tx.amount,
            TxType::Expenditure => expenditure += tx.amount,
        }
    }
    DashboardStats {
        balance,
        income,
        expenditure,
        savings: income - expenditure,
    }
}

/// Monthly sums for the [`CHART_MONTHS`] months ending at `today`'s month,
/// oldest first. Empty months report zero.
pub fn chart_series(transactions: &[Transaction], today: NaiveDate) -> ChartSeries {
    let days: Vec<(NaiveDate, Decimal)> = transactions
        .iter()
        .filter_map(|tx| tx.day().map(|d| (d, tx.amount)))
        .collect();

    let points = (0..CHART_MONTHS)
        .rev()
        .map(|back| {
            let month = month_start(today, -back);
            let total = days
                .iter()
                .filter(|(d, _)| same_month(*d, month))
                .map(|(_, amount)| *amount)
                .sum();
            MonthTotal {
                month,
                label: month.format("%b %Y").to_string(),
                total,
            }
        })
        .collect();
    ChartSeries { points }
}

pub struct DashboardView {
    stats: Signal<DashboardStats>,
    loaded: Signal<bool>,
    _inputs: Vec<ListenerHandle>,
}

impl DashboardView {
    pub fn new(transactions: &TransactionStore, balance: &BalanceStore) -> Self {
        let stats = Signal::new(DashboardStats::default());
        let loaded = Signal::new(false);

        let txs = transactions.signal().clone();
        let bal = balance.signal().clone();
        let txs_loaded = transactions.loaded_signal().clone();
        let bal_loaded = balance.loaded_signal().clone();

        let mut inputs = Vec::with_capacity(4);
        {
            let (stats, bal) = (stats.clone(), bal.clone());
            inputs.push(txs.subscribe(move |items: &Vec<Transaction>| {
                stats.set_if_changed(dashboard_stats(items, bal.get()));
            }));
        }
        {
            let (stats, txs) = (stats.clone(), txs.clone());
            inputs.push(bal.subscribe(move |balance: &Decimal| {
                let next = txs.with(|items| dashboard_stats(items, *balance));
                stats.set_if_changed(next);
            }));
        }
        {
            let (loaded, other) = (loaded.clone(), bal_loaded.clone());
            inputs.push(txs_loaded.subscribe(move |ready: &bool| {
                loaded.set_if_changed(*ready && other.get());
            }));
        }
        {
            let (loaded, other) = (loaded.clone(), txs_loaded.clone());
            inputs.push(bal_loaded.subscribe(move |ready: &bool| {
                loaded.set_if_changed(*ready && other.get());
            }));
        }

        Self {
            stats,
            loaded,
            _inputs: inputs,
        }
    }

    pub fn get(&self) -> DashboardStats {
        self.stats.get()
    }

    /// True once both the transactions and the balance are loaded.
    pub fn loaded(&self) -> bool {
        self.loaded.get()
    }

    pub fn subscribe(&self, f: impl Fn(&DashboardStats) + Send + Sync + 'static) -> ListenerHandle {
        self.stats.subscribe(f)
    }
}

pub struct ChartView {
    series: Signal<ChartSeries>,
    transactions: Signal<Vec<Transaction>>,
    clock: Arc<dyn Clock>,
    _input: ListenerHandle,
}

impl ChartView {
    pub fn new(transactions: &TransactionStore, clock: Arc<dyn Clock>) -> Self {
        let series = Signal::new(ChartSeries::default());
        let txs = transactions.signal().clone();
        let input = {
            let (series, clock) = (series.clone(), Arc::clone(&clock));
            txs.subscribe(move |items: &Vec<Transaction>| {
                series.set_if_changed(chart_series(items, clock.today()));
            })
        };
        Self {
            series,
            transactions: txs,
            clock,
            _input: input,
        }
    }

    /// Re-evaluated against the clock on every call.
    pub fn get(&self) -> ChartSeries {
        let today = self.clock.today();
        let next = self.transactions.with(|items| chart_series(items, today));
        self.series.set_if_changed(next.clone());
        next
    }

    pub fn subscribe(&self, f: impl Fn(&ChartSeries) + Send + Sync + 'static) -> ListenerHandle {
        self.series.subscribe(f)
    }
}
