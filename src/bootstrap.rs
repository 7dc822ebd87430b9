// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One-shot overview read for the first dashboard render.
//!
//! This is a plain read, separate from the live stores. Its result is not
//! authoritative and is never merged into any store.

use crate::codec;
use crate::document::UserScope;
use crate::error::{Result, SyncError};
use crate::models::{DashboardStats, Identity, Transaction};
use crate::remote::DocumentStore;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    /// Stored stats from `users/{uid}/stats/overview`, zero when absent.
    pub stats: DashboardStats,
    /// Every transaction, in no particular order.
    pub transactions: Vec<Transaction>,
}

pub fn load_overview(remote: &dyn DocumentStore, identity: Option<&Identity>) -> Result<Overview> {
    let identity = identity.ok_or(SyncError::Unauthenticated)?;
    let scope = UserScope::new(&identity.uid);

    let stats_doc = remote.read(&scope.stats_overview())?;
    let stats = codec::decode_overview(stats_doc.as_ref());

    let transactions = remote
        .list(&scope.transactions())?
        .iter()
        .map(codec::decode_transaction)
        .collect();

    Ok(Overview {
        stats,
        transactions,
    })
}
