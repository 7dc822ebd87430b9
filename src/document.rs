// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The remote document model: typed field values, documents and the
//! slash-separated paths that address them.

use crate::error::{Result, SyncError};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// A point in time with nanosecond precision, as stored by the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: u32,
}

impl Timestamp {
    pub fn now() -> Self {
        Self::from_datetime(&Utc::now())
    }

    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self {
            seconds: dt.timestamp(),
            nanos: dt.timestamp_subsec_nanos(),
        }
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanos)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    Timestamp(Timestamp),
    String(String),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Bool(_) => 1,
            FieldValue::Integer(_) | FieldValue::Double(_) => 2,
            FieldValue::Timestamp(_) => 3,
            FieldValue::String(_) => 4,
        }
    }

    /// Total order used for `orderBy` queries: values of different kinds
    /// order null < bool < number < timestamp < string.
    pub fn order_cmp(&self, other: &FieldValue) -> Ordering {
        use FieldValue::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Integer(a), Double(b)) => (*a as f64).total_cmp(b),
            (Double(a), Integer(b)) => a.total_cmp(&(*b as f64)),
            (Double(a), Double(b)) => a.total_cmp(b),
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Timestamp> for FieldValue {
    fn from(ts: Timestamp) -> Self {
        FieldValue::Timestamp(ts)
    }
}

pub type Fields = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// Path to a collection: an odd number of segments (`users/u1/budgets`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath {
    segments: Vec<String>,
}

impl CollectionPath {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    pub fn parse(path: &str) -> Result<Self> {
        let segments = split_segments(path)?;
        if segments.len() % 2 == 0 {
            return Err(SyncError::InvalidPath(path.to_string()));
        }
        Ok(Self { segments })
    }

    pub fn doc(&self, id: impl Into<String>) -> DocPath {
        DocPath {
            collection: self.clone(),
            id: id.into(),
        }
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// Path to a single document: its parent collection plus an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocPath {
    collection: CollectionPath,
    id: String,
}

impl DocPath {
    pub fn parse(path: &str) -> Result<Self> {
        let mut segments = split_segments(path)?;
        if segments.len() % 2 != 0 {
            return Err(SyncError::InvalidPath(path.to_string()));
        }
        let id = segments.pop().unwrap_or_default();
        Ok(Self {
            collection: CollectionPath { segments },
            id,
        })
    }

    pub fn collection(&self, name: impl Into<String>) -> CollectionPath {
        let mut segments = self.collection.segments.clone();
        segments.push(self.id.clone());
        segments.push(name.into());
        CollectionPath { segments }
    }

    pub fn parent(&self) -> &CollectionPath {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

fn split_segments(path: &str) -> Result<Vec<String>> {
    let segments: Vec<String> = path.split('/').map(str::to_string).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(SyncError::InvalidPath(path.to_string()));
    }
    Ok(segments)
}

/// Every path the stores touch, scoped to one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserScope {
    user: DocPath,
}

impl UserScope {
    pub fn new(uid: &str) -> Self {
        Self {
            user: CollectionPath::root("users").doc(uid),
        }
    }

    pub fn uid(&self) -> &str {
        self.user.id()
    }

    /// `users/{uid}`: holds the account balance.
    pub fn profile(&self) -> DocPath {
        self.user.clone()
    }

    pub fn transactions(&self) -> CollectionPath {
        self.user.collection("transactions")
    }

    pub fn budgets(&self) -> CollectionPath {
        self.user.collection("budgets")
    }

    pub fn reminders(&self) -> CollectionPath {
        self.user.collection("reminders")
    }

    pub fn collection(&self, name: &str) -> CollectionPath {
        self.user.collection(name)
    }

    pub fn stats_overview(&self) -> DocPath {
        self.user.collection("stats").doc("overview")
    }
}
