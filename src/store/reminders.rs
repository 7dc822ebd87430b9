// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Collection, LiveStore, SyncContext, write_failure};
use crate::codec::{self, field};
use crate::document::{Document, Timestamp};
use crate::error::Result;
use crate::models::{NewReminder, Reminder};
use crate::remote::Direction;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};

/// Reserved id of the assistant reminder. Never a remote document id.
pub const SENTINEL_ID: &str = "ai-assistant";

static ASSISTANT: Lazy<Reminder> = Lazy::new(|| Reminder {
    id: SENTINEL_ID.to_string(),
    title: "AI Assistant".to_string(),
    subtitle: Some("Click here for saving tips".to_string()),
    highlight: false,
    is_ai: true,
    amount: None,
    description: None,
    category: None,
    due_date: None,
    icon: Some("assistant".to_string()),
    r#type: None,
});

static LOCAL_SEQ: AtomicU64 = AtomicU64::new(0);

/// The assistant reminder that heads every reminder list.
pub fn assistant() -> Reminder {
    ASSISTANT.clone()
}

fn local_id() -> String {
    let seq = LOCAL_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", chrono::Utc::now().timestamp_millis(), seq)
}

/// `users/{uid}/reminders`, soonest due first, behind the assistant.
pub struct Reminders;

impl Collection for Reminders {
    type Item = Reminder;

    const COLLECTION: &'static str = "reminders";
    const ORDER_BY: &'static str = field::DUE_DATE;
    const DIRECTION: Direction = Direction::Ascending;

    fn decode(doc: &Document) -> Reminder {
        codec::decode_reminder(doc)
    }

    fn empty() -> Vec<Reminder> {
        vec![assistant()]
    }

    fn assemble(docs: Vec<Document>) -> Vec<Reminder> {
        let mut items = Vec::with_capacity(docs.len() + 1);
        items.push(assistant());
        for doc in &docs {
            if doc.id == SENTINEL_ID {
                log::warn!("reminders: skipping remote document with reserved id {}", SENTINEL_ID);
                continue;
            }
            items.push(Self::decode(doc));
        }
        items
    }
}

pub type ReminderStore = LiveStore<Reminders>;

impl LiveStore<Reminders> {
    pub fn connect(ctx: &SyncContext) -> Self {
        LiveStore::new(Reminders, ctx)
    }

    /// Create a reminder and return its id.
    ///
    /// AI reminders are never persisted: they are appended to the local list
    /// under a generated id and disappear with the next snapshot.
    pub fn add(&self, reminder: NewReminder) -> Result<String> {
        if reminder.is_ai {
            let id = local_id();
            let local = reminder.with_id(id.clone());
            self.modify(|items| items.push(local));
            return Ok(id);
        }

        let scope = self.scope()?;
        let fields = codec::encode_reminder(&reminder, Timestamp::now())?;
        let path = scope.reminders();
        let id = self
            .remote()
            .create(&path, fields)
            .map_err(|e| write_failure(&path, e))?;
        log::debug!("reminders: created {}/{}", path, id);
        Ok(id)
    }

    /// Delete a reminder. Removing the assistant is a no-op.
    pub fn remove(&self, id: &str) -> Result<()> {
        if id == SENTINEL_ID {
            return Ok(());
        }
        let scope = self.scope()?;
        let path = scope.reminders().doc(id);
        self.remote()
            .delete(&path)
            .map_err(|e| write_failure(&path, e))
    }
}
