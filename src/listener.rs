// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::SyncError;
use std::fmt;
use std::sync::Arc;

slotmap::new_key_type! {
    /// Key of a registered callback inside a listener registry.
    pub struct ListenerKey;
}

/// Owns one registration. Closing is idempotent and also happens on drop.
#[must_use = "dropping a ListenerHandle closes the registration"]
pub struct ListenerHandle {
    close: Option<Box<dyn FnOnce() + Send>>,
}

impl ListenerHandle {
    pub fn new(close: impl FnOnce() + Send + 'static) -> Self {
        Self {
            close: Some(Box::new(close)),
        }
    }

    pub fn is_open(&self) -> bool {
        self.close.is_some()
    }

    pub fn close(&mut self) {
        if let Some(close) = self.close.take() {
            close();
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("open", &self.is_open())
            .finish()
    }
}

type DataFn<T> = Arc<dyn Fn(T) + Send + Sync>;
type ErrorFn = Arc<dyn Fn(SyncError) + Send + Sync>;

/// The two callback slots of a live subscription.
pub struct SnapshotListener<T> {
    on_data: DataFn<T>,
    on_error: ErrorFn,
}

impl<T> Clone for SnapshotListener<T> {
    fn clone(&self) -> Self {
        Self {
            on_data: Arc::clone(&self.on_data),
            on_error: Arc::clone(&self.on_error),
        }
    }
}

impl<T: 'static> SnapshotListener<T> {
    pub fn new(
        on_data: impl Fn(T) + Send + Sync + 'static,
        on_error: impl Fn(SyncError) + Send + Sync + 'static,
    ) -> Self {
        Self {
            on_data: Arc::new(on_data),
            on_error: Arc::new(on_error),
        }
    }

    pub fn data(&self, value: T) {
        (self.on_data)(value)
    }

    pub fn error(&self, err: SyncError) {
        (self.on_error)(err)
    }

    /// Adapt the data slot, e.g. to decode raw documents before delivery.
    pub fn map<U: 'static>(self, f: impl Fn(U) -> T + Send + Sync + 'static) -> SnapshotListener<U> {
        let on_data = self.on_data;
        SnapshotListener {
            on_data: Arc::new(move |u| on_data(f(u))),
            on_error: self.on_error,
        }
    }
}
