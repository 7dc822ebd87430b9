// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use budgetsync::codec;
use budgetsync::document::{CollectionPath, DocPath, Document, FieldValue, Fields};
use budgetsync::error::{Result, SyncError};
use budgetsync::identity::LocalIdentityChannel;
use budgetsync::listener::{ListenerHandle, SnapshotListener};
use budgetsync::models::Identity;
use budgetsync::remote::{CollectionQuery, DocumentStore};
use budgetsync::SyncContext;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};

struct Sub {
    path: String,
    listener: SnapshotListener<Vec<Document>>,
    open: bool,
}

struct Watch {
    path: String,
    listener: SnapshotListener<Option<Document>>,
    open: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Write {
    pub op: &'static str,
    pub path: String,
    pub fields: Fields,
}

#[derive(Default)]
struct State {
    subs: Vec<Sub>,
    watches: Vec<Watch>,
    writes: Vec<Write>,
    events: Vec<String>,
    fail_writes: bool,
    next_id: u64,
}

/// Remote that records every call and only delivers when told to.
#[derive(Clone, Default)]
pub struct FakeRemote {
    state: Arc<Mutex<State>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// "open <path>" / "close <path>" in call order, subscriptions and watches alike.
    pub fn events(&self) -> Vec<String> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn subscription_paths(&self) -> Vec<String> {
        let s = self.state.lock().unwrap();
        s.subs.iter().map(|sub| sub.path.clone()).collect()
    }

    pub fn open_subscriptions(&self) -> usize {
        let s = self.state.lock().unwrap();
        s.subs.iter().filter(|sub| sub.open).count() + s.watches.iter().filter(|w| w.open).count()
    }

    pub fn subscription_count(&self) -> usize {
        self.state.lock().unwrap().subs.len()
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.state.lock().unwrap().subs[index].open
    }

    /// Deliver to the `index`-th subscription ever opened, closed or not.
    pub fn deliver(&self, index: usize, docs: Vec<Document>) {
        let listener = self.state.lock().unwrap().subs[index].listener.clone();
        listener.data(docs);
    }

    pub fn fail(&self, index: usize, message: &str) {
        let (path, listener) = {
            let s = self.state.lock().unwrap();
            (s.subs[index].path.clone(), s.subs[index].listener.clone())
        };
        listener.error(SyncError::subscription(path, message));
    }

    /// Deliver to the newest subscription on `path`.
    pub fn deliver_to(&self, path: &str, docs: Vec<Document>) {
        let index = {
            let s = self.state.lock().unwrap();
            s.subs
                .iter()
                .rposition(|sub| sub.path == path)
                .unwrap_or_else(|| panic!("no subscription on {path}"))
        };
        self.deliver(index, docs);
    }

    pub fn deliver_doc(&self, path: &str, doc: Option<Document>) {
        let listener = {
            let s = self.state.lock().unwrap();
            s.watches
                .iter()
                .rev()
                .find(|w| w.path == path)
                .unwrap_or_else(|| panic!("no watch on {path}"))
                .listener
                .clone()
        };
        listener.data(doc);
    }

    pub fn writes(&self) -> Vec<Write> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    fn record(&self, op: &'static str, path: String, fields: Fields) -> Result<()> {
        let mut s = self.state.lock().unwrap();
        if s.fail_writes {
            return Err(SyncError::write(path, "permission denied"));
        }
        s.writes.push(Write { op, path, fields });
        Ok(())
    }
}

impl DocumentStore for FakeRemote {
    fn subscribe(
        &self,
        query: CollectionQuery,
        listener: SnapshotListener<Vec<Document>>,
    ) -> ListenerHandle {
        let path = query.path.to_string();
        let index = {
            let mut s = self.state.lock().unwrap();
            s.events.push(format!("open {path}"));
            s.subs.push(Sub {
                path: path.clone(),
                listener,
                open: true,
            });
            s.subs.len() - 1
        };
        let state = Arc::clone(&self.state);
        ListenerHandle::new(move || {
            let mut s = state.lock().unwrap();
            s.subs[index].open = false;
            s.events.push(format!("close {path}"));
        })
    }

    fn watch(&self, path: DocPath, listener: SnapshotListener<Option<Document>>) -> ListenerHandle {
        let path = path.to_string();
        let index = {
            let mut s = self.state.lock().unwrap();
            s.events.push(format!("open {path}"));
            s.watches.push(Watch {
                path: path.clone(),
                listener,
                open: true,
            });
            s.watches.len() - 1
        };
        let state = Arc::clone(&self.state);
        ListenerHandle::new(move || {
            let mut s = state.lock().unwrap();
            s.watches[index].open = false;
            s.events.push(format!("close {path}"));
        })
    }

    fn create(&self, collection: &CollectionPath, fields: Fields) -> Result<String> {
        let id = {
            let mut s = self.state.lock().unwrap();
            s.next_id += 1;
            format!("doc{}", s.next_id)
        };
        self.record("create", collection.doc(id.clone()).to_string(), fields)?;
        Ok(id)
    }

    fn set(&self, path: &DocPath, fields: Fields) -> Result<()> {
        self.record("set", path.to_string(), fields)
    }

    fn update(&self, path: &DocPath, fields: Fields) -> Result<()> {
        self.record("update", path.to_string(), fields)
    }

    fn delete(&self, path: &DocPath) -> Result<()> {
        self.record("delete", path.to_string(), Fields::new())
    }

    fn read(&self, _path: &DocPath) -> Result<Option<Document>> {
        Ok(None)
    }

    fn list(&self, _collection: &CollectionPath) -> Result<Vec<Document>> {
        Ok(Vec::new())
    }
}

pub fn context(channel: &LocalIdentityChannel, remote: &FakeRemote) -> SyncContext {
    SyncContext::new(Arc::new(channel.clone()), Arc::new(remote.clone()))
}

pub fn signed_in(uid: &str) -> LocalIdentityChannel {
    LocalIdentityChannel::signed_in(Identity::new(uid))
}

pub fn doc(id: &str, fields: &[(&str, FieldValue)]) -> Document {
    Document::new(
        id,
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    )
}

pub fn tx_doc(id: &str, date: &str, amount: i64, kind: &str) -> Document {
    doc(
        id,
        &[
            ("date", codec::encode_day(date).unwrap()),
            ("description", "item".into()),
            ("amount", FieldValue::Integer(amount)),
            ("category", "General".into()),
            ("type", kind.into()),
        ],
    )
}

pub fn dec(n: i64) -> Decimal {
    Decimal::from(n)
}
