// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Collection, LiveStore, SyncContext, write_failure};
use crate::codec::{self, field};
use crate::document::{Document, Timestamp};
use crate::error::Result;
use crate::models::{NewTransaction, Transaction};
use crate::remote::Direction;

/// `users/{uid}/transactions`, newest first.
pub struct Transactions;

impl Collection for Transactions {
    type Item = Transaction;

    const COLLECTION: &'static str = "transactions";
    const ORDER_BY: &'static str = field::DATE;
    const DIRECTION: Direction = Direction::Descending;

    fn decode(doc: &Document) -> Transaction {
        codec::decode_transaction(doc)
    }
}

pub type TransactionStore = LiveStore<Transactions>;

impl LiveStore<Transactions> {
    pub fn connect(ctx: &SyncContext) -> Self {
        LiveStore::new(Transactions, ctx)
    }

    /// Record a transaction for the signed-in identity and return its id.
    ///
    /// The local list is not touched; the transaction shows up with the
    /// next snapshot.
    pub fn add(&self, tx: NewTransaction) -> Result<String> {
        let scope = self.scope()?;
        let fields = codec::encode_transaction(&tx, Timestamp::now())?;
        let path = scope.transactions();
        let id = self
            .remote()
            .create(&path, fields)
            .map_err(|e| write_failure(&path, e))?;
        log::debug!("transactions: created {}/{}", path, id);
        Ok(id)
    }
}
