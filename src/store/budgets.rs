// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Collection, LiveStore, SyncContext, write_failure};
use crate::codec::{self, field};
use crate::document::Document;
use crate::error::Result;
use crate::models::{Budget, BudgetPatch, NewBudget};
use crate::remote::Direction;

/// `users/{uid}/budgets`, latest start date first.
pub struct Budgets;

impl Collection for Budgets {
    type Item = Budget;

    const COLLECTION: &'static str = "budgets";
    const ORDER_BY: &'static str = field::START_DATE;
    const DIRECTION: Direction = Direction::Descending;

    fn decode(doc: &Document) -> Budget {
        codec::decode_budget(doc)
    }
}

pub type BudgetStore = LiveStore<Budgets>;

impl LiveStore<Budgets> {
    pub fn connect(ctx: &SyncContext) -> Self {
        LiveStore::new(Budgets, ctx)
    }

    pub fn add(&self, budget: NewBudget) -> Result<String> {
        let scope = self.scope()?;
        let fields = codec::encode_budget(&budget)?;
        let path = scope.budgets();
        let id = self
            .remote()
            .create(&path, fields)
            .map_err(|e| write_failure(&path, e))?;
        log::debug!("budgets: created {}/{}", path, id);
        Ok(id)
    }

    /// Write only the fields set on `patch`; everything else is left as is.
    pub fn update(&self, id: &str, patch: BudgetPatch) -> Result<()> {
        let scope = self.scope()?;
        let fields = codec::encode_budget_patch(&patch)?;
        let path = scope.budgets().doc(id);
        self.remote()
            .update(&path, fields)
            .map_err(|e| write_failure(&path, e))
    }

    pub fn remove(&self, id: &str) -> Result<()> {
        let scope = self.scope()?;
        let path = scope.budgets().doc(id);
        self.remote()
            .delete(&path)
            .map_err(|e| write_failure(&path, e))
    }
}
