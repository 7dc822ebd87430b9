// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Contract of the remote per-user document store.

use crate::document::{CollectionPath, DocPath, Document, Fields};
use crate::error::Result;
use crate::listener::{ListenerHandle, SnapshotListener};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// A live query over one collection, ordered by a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery {
    pub path: CollectionPath,
    pub order_by: String,
    pub direction: Direction,
}

impl CollectionQuery {
    pub fn new(path: CollectionPath, order_by: &str, direction: Direction) -> Self {
        Self {
            path,
            order_by: order_by.to_string(),
            direction,
        }
    }
}

pub trait DocumentStore: Send + Sync {
    /// Open a live subscription. Every delivery is the full, ordered result
    /// set; closing the returned handle stops further deliveries.
    fn subscribe(
        &self,
        query: CollectionQuery,
        listener: SnapshotListener<Vec<Document>>,
    ) -> ListenerHandle;

    /// Watch a single document; `None` is delivered while it does not exist.
    fn watch(&self, path: DocPath, listener: SnapshotListener<Option<Document>>) -> ListenerHandle;

    /// Create a document with a generated id and return the id.
    fn create(&self, collection: &CollectionPath, fields: Fields) -> Result<String>;

    /// Merge `fields` into the document, creating it when absent.
    fn set(&self, path: &DocPath, fields: Fields) -> Result<()>;

    /// Merge `fields` into an existing document; fails when it is absent.
    fn update(&self, path: &DocPath, fields: Fields) -> Result<()>;

    fn delete(&self, path: &DocPath) -> Result<()>;

    fn read(&self, path: &DocPath) -> Result<Option<Document>>;

    /// One-shot, unordered read of a whole collection.
    fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>>;
}
