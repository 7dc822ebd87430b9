// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Result;
use crate::listener::{ListenerHandle, ListenerKey};
use crate::models::Identity;
use crate::utils::lock;
use slotmap::SlotMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub type IdentityCallback = Arc<dyn Fn(Option<Identity>) + Send + Sync>;

/// Source of the current authenticated identity.
///
/// `on_change` must deliver the current state to the new listener before
/// returning, then exactly one event per transition, in order.
pub trait IdentityChannel: Send + Sync {
    fn current(&self) -> Option<Identity>;

    fn on_change(&self, listener: IdentityCallback) -> ListenerHandle;
}

/// Remembers the signed-in identity between runs.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Result<Option<Identity>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Identity>(&raw) {
            Ok(identity) if !identity.uid.is_empty() => Ok(Some(identity)),
            Ok(_) => Ok(None),
            Err(e) => {
                log::warn!("Ignoring unreadable session file {}: {e}", self.path.display());
                Ok(None)
            }
        }
    }

    pub fn save(&self, identity: &Identity) -> Result<()> {
        fs::write(&self.path, serde_json::to_string_pretty(identity)?)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

struct ChannelInner {
    current: Mutex<Option<Identity>>,
    listeners: Mutex<SlotMap<ListenerKey, IdentityCallback>>,
    session: Option<SessionFile>,
}

/// In-process identity channel, optionally persisted to a [`SessionFile`].
#[derive(Clone)]
pub struct LocalIdentityChannel {
    inner: Arc<ChannelInner>,
}

impl Default for LocalIdentityChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalIdentityChannel {
    pub fn new() -> Self {
        Self::build(None, None)
    }

    pub fn signed_in(identity: Identity) -> Self {
        Self::build(Some(identity), None)
    }

    /// Restore the identity stored in `session`, if any.
    pub fn persistent(session: SessionFile) -> Result<Self> {
        let current = session.load()?;
        Ok(Self::build(current, Some(session)))
    }

    fn build(current: Option<Identity>, session: Option<SessionFile>) -> Self {
        Self {
            inner: Arc::new(ChannelInner {
                current: Mutex::new(current),
                listeners: Mutex::new(SlotMap::with_key()),
                session,
            }),
        }
    }

    pub fn sign_in(&self, identity: Identity) -> Result<()> {
        self.transition(Some(identity))
    }

    pub fn sign_out(&self) -> Result<()> {
        self.transition(None)
    }

    fn transition(&self, next: Option<Identity>) -> Result<()> {
        {
            let mut current = lock(&self.inner.current);
            let same = match (current.as_ref(), next.as_ref()) {
                (Some(a), Some(b)) => a.uid == b.uid,
                (None, None) => true,
                _ => false,
            };
            if same {
                return Ok(());
            }
            // The session file is written first; a failed write leaves the
            // channel on the previous identity.
            if let Some(session) = &self.inner.session {
                match &next {
                    Some(identity) => session.save(identity)?,
                    None => session.clear()?,
                }
            }
            *current = next.clone();
        }

        log::debug!(
            "identity changed to {}",
            next.as_ref().map(|i| i.uid.as_str()).unwrap_or("<none>")
        );
        let callbacks: Vec<IdentityCallback> =
            lock(&self.inner.listeners).values().cloned().collect();
        for callback in callbacks {
            callback(next.clone());
        }
        Ok(())
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.inner.listeners).len()
    }
}

impl IdentityChannel for LocalIdentityChannel {
    fn current(&self) -> Option<Identity> {
        lock(&self.inner.current).clone()
    }

    fn on_change(&self, listener: IdentityCallback) -> ListenerHandle {
        let key = lock(&self.inner.listeners).insert(Arc::clone(&listener));
        listener(self.current());

        let weak = Arc::downgrade(&self.inner);
        ListenerHandle::new(move || {
            if let Some(inner) = weak.upgrade() {
                lock(&inner.listeners).remove(key);
            }
        })
    }
}
