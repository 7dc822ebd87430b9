// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{LiveStore, Source, SyncContext, write_failure};
use crate::codec;
use crate::document::{Document, UserScope};
use crate::error::Result;
use crate::listener::{ListenerHandle, SnapshotListener};
use crate::remote::DocumentStore;
use rust_decimal::Decimal;

/// The `balance` field of `users/{uid}`; zero when absent.
pub struct AccountBalance;

impl Source for AccountBalance {
    type Value = Decimal;

    const NAME: &'static str = "balance";

    fn baseline(&self) -> Decimal {
        codec::defaults::BALANCE
    }

    fn open(
        &self,
        remote: &dyn DocumentStore,
        scope: &UserScope,
        sink: SnapshotListener<Decimal>,
    ) -> ListenerHandle {
        remote.watch(
            scope.profile(),
            sink.map(|doc: Option<Document>| codec::decode_balance(doc.as_ref())),
        )
    }
}

pub type BalanceStore = LiveStore<AccountBalance>;

impl LiveStore<AccountBalance> {
    pub fn connect(ctx: &SyncContext) -> Self {
        LiveStore::new(AccountBalance, ctx)
    }

    /// Store a new balance on the user document.
    pub fn set(&self, balance: Decimal) -> Result<()> {
        let scope = self.scope()?;
        let path = scope.profile();
        self.remote()
            .set(&path, codec::encode_balance(balance))
            .map_err(|e| write_failure(&path, e))
    }
}
