// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Observable value cells. Subscribing delivers the current value at once,
//! then every later publication.

use crate::listener::{ListenerHandle, ListenerKey};
use crate::utils::lock;
use slotmap::SlotMap;
use std::sync::{Arc, Mutex};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: Mutex<T>,
    listeners: Mutex<SlotMap<ListenerKey, Callback<T>>>,
}

pub struct Signal<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: Mutex::new(value),
                listeners: Mutex::new(SlotMap::with_key()),
            }),
        }
    }

    pub fn get(&self) -> T {
        lock(&self.inner.value).clone()
    }

    /// Read the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&lock(&self.inner.value))
    }

    pub fn subscribe(&self, f: impl Fn(&T) + Send + Sync + 'static) -> ListenerHandle {
        let callback: Callback<T> = Arc::new(f);
        let key = lock(&self.inner.listeners).insert(Arc::clone(&callback));
        let current = self.get();
        callback(&current);

        let weak = Arc::downgrade(&self.inner);
        ListenerHandle::new(move || {
            if let Some(inner) = weak.upgrade() {
                lock(&inner.listeners).remove(key);
            }
        })
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.inner.listeners).len()
    }

    /// Replace the value without notifying. Pair with [`Signal::notify`]
    /// once any caller-side lock is released.
    pub(crate) fn store(&self, value: T) {
        *lock(&self.inner.value) = value;
    }

    /// Deliver the latest value to every listener. Listeners are called with
    /// no lock held, so they may read or subscribe re-entrantly.
    pub(crate) fn notify(&self) {
        let callbacks: Vec<Callback<T>> = lock(&self.inner.listeners).values().cloned().collect();
        if callbacks.is_empty() {
            return;
        }
        let value = self.get();
        for callback in callbacks {
            callback(&value);
        }
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Signal<T> {
    /// Replace the value without notifying; returns whether it changed.
    pub(crate) fn store_if_changed(&self, value: T) -> bool {
        let mut current = lock(&self.inner.value);
        if *current == value {
            return false;
        }
        *current = value;
        true
    }

    pub fn set_if_changed(&self, value: T) {
        if self.store_if_changed(value) {
            self.notify();
        }
    }
}
