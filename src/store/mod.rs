// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local mirrors of remote data that follow the signed-in identity.

pub mod balance;
pub mod budgets;
pub mod reminders;
pub mod transactions;

pub use balance::{AccountBalance, BalanceStore};
pub use budgets::{BudgetStore, Budgets};
pub use reminders::{ReminderStore, Reminders, SENTINEL_ID};
pub use transactions::{TransactionStore, Transactions};

use crate::derived::{Clock, SystemClock};
use crate::document::{CollectionPath, Document, UserScope};
use crate::error::{Result, SyncError};
use crate::identity::IdentityChannel;
use crate::listener::{ListenerHandle, SnapshotListener};
use crate::models::Identity;
use crate::remote::{CollectionQuery, Direction, DocumentStore};
use crate::signal::Signal;
use crate::utils::lock;
use std::fmt;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct SyncContext {
    pub identity: Arc<dyn IdentityChannel>,
    pub remote: Arc<dyn DocumentStore>,
    pub clock: Arc<dyn Clock>,
}

impl SyncContext {
    pub fn new(identity: Arc<dyn IdentityChannel>, remote: Arc<dyn DocumentStore>) -> Self {
        Self {
            identity,
            remote,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No identity observed yet, or torn down.
    Unbound,
    NoIdentity,
    /// Subscription requested, no snapshot yet.
    Subscribing,
    Active,
    /// The subscription reported an error; the last snapshot is kept.
    Error,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Unbound => "unbound",
            Phase::NoIdentity => "no-identity",
            Phase::Subscribing => "subscribing",
            Phase::Active => "active",
            Phase::Error => "error",
        };
        f.write_str(s)
    }
}

/// What a store mirrors and how to open its live feed.
pub trait Source: Send + Sync + 'static {
    type Value: Clone + Send + Sync + 'static;

    const NAME: &'static str;

    /// Value published while there is no snapshot for the current identity.
    fn baseline(&self) -> Self::Value;

    fn open(
        &self,
        remote: &dyn DocumentStore,
        scope: &UserScope,
        sink: SnapshotListener<Self::Value>,
    ) -> ListenerHandle;
}

/// An ordered per-user collection mirrored as a `Vec`.
pub trait Collection: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    const COLLECTION: &'static str;
    const ORDER_BY: &'static str;
    const DIRECTION: Direction;

    fn decode(doc: &Document) -> Self::Item;

    fn empty() -> Vec<Self::Item> {
        Vec::new()
    }

    fn assemble(docs: Vec<Document>) -> Vec<Self::Item> {
        docs.iter().map(Self::decode).collect()
    }

    fn path(scope: &UserScope) -> CollectionPath {
        scope.collection(Self::COLLECTION)
    }
}

impl<C: Collection> Source for C {
    type Value = Vec<C::Item>;

    const NAME: &'static str = C::COLLECTION;

    fn baseline(&self) -> Vec<C::Item> {
        C::empty()
    }

    fn open(
        &self,
        remote: &dyn DocumentStore,
        scope: &UserScope,
        sink: SnapshotListener<Vec<C::Item>>,
    ) -> ListenerHandle {
        let query = CollectionQuery::new(C::path(scope), C::ORDER_BY, C::DIRECTION);
        remote.subscribe(query, sink.map(C::assemble))
    }
}

struct Session {
    phase: Phase,
    identity: Option<Identity>,
    generation: u64,
    subscription: Option<ListenerHandle>,
    last_error: Option<String>,
}

struct Engine<S: Source> {
    source: S,
    remote: Arc<dyn DocumentStore>,
    items: Signal<S::Value>,
    loaded: Signal<bool>,
    session: Mutex<Session>,
}

impl<S: Source> Engine<S> {
    fn rebind(self: &Arc<Self>, identity: Option<Identity>) {
        let (previous, generation) = {
            let mut s = lock(&self.session);
            s.generation += 1;
            s.identity = identity.clone();
            s.last_error = None;
            s.phase = if identity.is_some() {
                Phase::Subscribing
            } else {
                Phase::NoIdentity
            };
            (s.subscription.take(), s.generation)
        };

        if let Some(mut previous) = previous {
            log::debug!("{}: closing subscription", S::NAME);
            previous.close();
        }

        let loaded_changed = {
            let s = lock(&self.session);
            if s.generation != generation {
                return;
            }
            self.items.store(self.source.baseline());
            self.loaded.store_if_changed(identity.is_none())
        };
        self.items.notify();
        if loaded_changed {
            self.loaded.notify();
        }

        let Some(identity) = identity else {
            log::debug!("{}: no identity", S::NAME);
            return;
        };

        let scope = UserScope::new(&identity.uid);
        log::debug!("{}: subscribing for {}", S::NAME, scope.uid());
        let mut handle = self
            .source
            .open(self.remote.as_ref(), &scope, self.sink(generation));

        let mut s = lock(&self.session);
        if s.generation == generation {
            s.subscription = Some(handle);
        } else {
            drop(s);
            handle.close();
        }
    }

    fn sink(self: &Arc<Self>, generation: u64) -> SnapshotListener<S::Value> {
        let on_data = Arc::downgrade(self);
        let on_error = on_data.clone();
        SnapshotListener::new(
            move |value| {
                if let Some(engine) = on_data.upgrade() {
                    engine.accept(generation, value);
                }
            },
            move |err| {
                if let Some(engine) = on_error.upgrade() {
                    engine.fail(generation, err);
                }
            },
        )
    }

    fn accept(&self, generation: u64, value: S::Value) {
        let loaded_changed = {
            let mut s = lock(&self.session);
            if s.generation != generation {
                log::debug!("{}: dropping snapshot from a closed subscription", S::NAME);
                return;
            }
            s.phase = Phase::Active;
            self.items.store(value);
            self.loaded.store_if_changed(true)
        };
        self.items.notify();
        if loaded_changed {
            self.loaded.notify();
        }
    }

    fn fail(&self, generation: u64, err: SyncError) {
        let loaded_changed = {
            let mut s = lock(&self.session);
            if s.generation != generation {
                log::debug!("{}: dropping error from a closed subscription", S::NAME);
                return;
            }
            log::error!("Error fetching {}: {}", S::NAME, err);
            s.phase = Phase::Error;
            s.last_error = Some(err.to_string());
            self.loaded.store_if_changed(true)
        };
        if loaded_changed {
            self.loaded.notify();
        }
    }

    fn modify(&self, f: impl FnOnce(&mut S::Value)) {
        {
            let _session = lock(&self.session);
            let mut value = self.items.get();
            f(&mut value);
            self.items.store(value);
        }
        self.items.notify();
    }
}

/// A live mirror of one remote source for whoever is signed in.
pub struct LiveStore<S: Source> {
    engine: Arc<Engine<S>>,
    binding: Mutex<ListenerHandle>,
}

impl<S: Source> LiveStore<S> {
    pub fn new(source: S, ctx: &SyncContext) -> Self {
        let baseline = source.baseline();
        let engine = Arc::new(Engine {
            source,
            remote: Arc::clone(&ctx.remote),
            items: Signal::new(baseline),
            loaded: Signal::new(false),
            session: Mutex::new(Session {
                phase: Phase::Unbound,
                identity: None,
                generation: 0,
                subscription: None,
                last_error: None,
            }),
        });

        let weak = Arc::downgrade(&engine);
        let binding = ctx.identity.on_change(Arc::new(move |identity| {
            if let Some(engine) = weak.upgrade() {
                engine.rebind(identity);
            }
        }));

        Self {
            engine,
            binding: Mutex::new(binding),
        }
    }

    pub fn get(&self) -> S::Value {
        self.engine.items.get()
    }

    pub fn subscribe(&self, f: impl Fn(&S::Value) + Send + Sync + 'static) -> ListenerHandle {
        self.engine.items.subscribe(f)
    }

    pub fn signal(&self) -> &Signal<S::Value> {
        &self.engine.items
    }

    pub fn loaded(&self) -> bool {
        self.engine.loaded.get()
    }

    pub fn loaded_signal(&self) -> &Signal<bool> {
        &self.engine.loaded
    }

    pub fn phase(&self) -> Phase {
        lock(&self.engine.session).phase
    }

    pub fn identity(&self) -> Option<Identity> {
        lock(&self.engine.session).identity.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        lock(&self.engine.session).last_error.clone()
    }

    /// Idempotent; the last published value is kept.
    pub fn destroy(&self) {
        lock(&self.binding).close();
        let previous = {
            let mut s = lock(&self.engine.session);
            s.generation += 1;
            s.phase = Phase::Unbound;
            s.identity = None;
            s.subscription.take()
        };
        if let Some(mut previous) = previous {
            log::debug!("{}: closing subscription", S::NAME);
            previous.close();
        }
    }

    pub(crate) fn scope(&self) -> Result<UserScope> {
        lock(&self.engine.session)
            .identity
            .as_ref()
            .map(|identity| UserScope::new(&identity.uid))
            .ok_or(SyncError::Unauthenticated)
    }

    pub(crate) fn remote(&self) -> &dyn DocumentStore {
        self.engine.remote.as_ref()
    }

    pub(crate) fn modify(&self, f: impl FnOnce(&mut S::Value)) {
        self.engine.modify(f)
    }
}

impl<C: Collection> LiveStore<C> {
    pub fn clear(&self) {
        self.modify(|items| *items = C::empty());
    }

    pub fn len(&self) -> usize {
        self.engine.items.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: Source> Drop for LiveStore<S> {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Remote rejections surface as `Write` failures naming the target path.
pub(crate) fn write_failure(path: impl fmt::Display, err: SyncError) -> SyncError {
    match err {
        e @ (SyncError::Write { .. } | SyncError::NotFound { .. }) => e,
        other => SyncError::write(path, other),
    }
}

pub struct Stores {
    pub transactions: TransactionStore,
    pub budgets: BudgetStore,
    pub reminders: ReminderStore,
    pub balance: BalanceStore,
}

impl Stores {
    pub fn connect(ctx: &SyncContext) -> Self {
        Self {
            transactions: TransactionStore::connect(ctx),
            budgets: BudgetStore::connect(ctx),
            reminders: ReminderStore::connect(ctx),
            balance: BalanceStore::connect(ctx),
        }
    }
}
