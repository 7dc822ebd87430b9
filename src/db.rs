// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! SQLite-backed document store. Documents live in one table keyed by
//! collection path and id; fields are stored as JSON. Listeners receive a
//! full snapshot when they subscribe and after every committed write that
//! touches what they watch.

use crate::config::Config;
use crate::document::{CollectionPath, DocPath, Document, FieldValue, Fields};
use crate::error::{Result, SyncError};
use crate::listener::{ListenerHandle, ListenerKey, SnapshotListener};
use crate::remote::{CollectionQuery, Direction, DocumentStore};
use crate::utils::lock;
use rand::Rng;
use rand::distributions::Alphanumeric;
use rusqlite::{Connection, OptionalExtension, params};
use slotmap::SlotMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

const AUTO_ID_LEN: usize = 20;

static NULL: FieldValue = FieldValue::Null;

pub fn open_or_init(config: &Config) -> Result<SqliteDocumentStore> {
    SqliteDocumentStore::open(config.db_path())
}

#[derive(Clone)]
enum Watch {
    Query {
        query: CollectionQuery,
        listener: SnapshotListener<Vec<Document>>,
    },
    Document {
        path: DocPath,
        listener: SnapshotListener<Option<Document>>,
    },
}

impl Watch {
    fn affected_by(&self, collection: &CollectionPath, id: &str) -> bool {
        match self {
            Watch::Query { query, .. } => &query.path == collection,
            Watch::Document { path, .. } => path.parent() == collection && path.id() == id,
        }
    }
}

type Registry = Arc<Mutex<SlotMap<ListenerKey, Watch>>>;

pub struct SqliteDocumentStore {
    conn: Mutex<Connection>,
    watches: Registry,
}

impl SqliteDocumentStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(mut conn: Connection) -> Result<Self> {
        init_schema(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            watches: Arc::new(Mutex::new(SlotMap::with_key())),
        })
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.watches).len()
    }

    fn register(&self, watch: Watch) -> (ListenerKey, ListenerHandle) {
        let key = lock(&self.watches).insert(watch);
        let registry = Arc::downgrade(&self.watches);
        let handle = ListenerHandle::new(move || {
            if let Some(registry) = registry.upgrade() {
                lock(&registry).remove(key);
            }
        });
        (key, handle)
    }

    fn is_registered(&self, key: ListenerKey) -> bool {
        lock(&self.watches).contains_key(key)
    }

    fn run_query(&self, query: &CollectionQuery) -> Result<Vec<Document>> {
        let field = query.order_by.as_str();
        let mut docs: Vec<Document> = self
            .list(&query.path)?
            .into_iter()
            .filter(|d| d.fields.contains_key(field))
            .collect();
        docs.sort_by(|a, b| {
            let ord = a
                .get(field)
                .unwrap_or(&NULL)
                .order_cmp(b.get(field).unwrap_or(&NULL))
                .then_with(|| a.id.cmp(&b.id));
            match query.direction {
                Direction::Ascending => ord,
                Direction::Descending => ord.reverse(),
            }
        });
        Ok(docs)
    }

    fn deliver(&self, watch: &Watch) {
        match watch {
            Watch::Query { query, listener } => match self.run_query(query) {
                Ok(docs) => listener.data(docs),
                Err(e) => listener.error(SyncError::subscription(&query.path, e)),
            },
            Watch::Document { path, listener } => match self.read(path) {
                Ok(doc) => listener.data(doc),
                Err(e) => listener.error(SyncError::subscription(path, e)),
            },
        }
    }

    /// Notify everything watching the written document. No lock is held
    /// while listeners run.
    fn publish(&self, collection: &CollectionPath, id: &str) {
        let affected: Vec<(ListenerKey, Watch)> = lock(&self.watches)
            .iter()
            .filter(|(_, w)| w.affected_by(collection, id))
            .map(|(k, w)| (k, w.clone()))
            .collect();
        for (key, watch) in affected {
            if self.is_registered(key) {
                self.deliver(&watch);
            }
        }
    }

    fn merge(&self, path: &DocPath, fields: Fields, must_exist: bool) -> Result<()> {
        {
            let conn = lock(&self.conn);
            let existing: Option<String> = conn
                .query_row(
                    "SELECT fields FROM documents WHERE collection=?1 AND id=?2",
                    params![path.parent().to_string(), path.id()],
                    |r| r.get(0),
                )
                .optional()?;
            let mut merged: Fields = match existing {
                Some(raw) => serde_json::from_str(&raw)?,
                None if must_exist => {
                    return Err(SyncError::NotFound {
                        path: path.to_string(),
                    });
                }
                None => Fields::new(),
            };
            merged.extend(fields);
            conn.execute(
                "INSERT INTO documents(collection, id, fields) VALUES (?1, ?2, ?3)
                 ON CONFLICT(collection, id) DO UPDATE SET fields=excluded.fields, updated_at=datetime('now')",
                params![
                    path.parent().to_string(),
                    path.id(),
                    serde_json::to_string(&merged)?
                ],
            )?;
        }
        self.publish(path.parent(), path.id());
        Ok(())
    }
}

fn auto_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(AUTO_ID_LEN)
        .map(char::from)
        .collect()
}

impl DocumentStore for SqliteDocumentStore {
    fn subscribe(
        &self,
        query: CollectionQuery,
        listener: SnapshotListener<Vec<Document>>,
    ) -> ListenerHandle {
        let watch = Watch::Query { query, listener };
        let (_, handle) = self.register(watch.clone());
        self.deliver(&watch);
        handle
    }

    fn watch(&self, path: DocPath, listener: SnapshotListener<Option<Document>>) -> ListenerHandle {
        let watch = Watch::Document { path, listener };
        let (_, handle) = self.register(watch.clone());
        self.deliver(&watch);
        handle
    }

    fn create(&self, collection: &CollectionPath, fields: Fields) -> Result<String> {
        let id = auto_id();
        {
            let conn = lock(&self.conn);
            conn.execute(
                "INSERT INTO documents(collection, id, fields) VALUES (?1, ?2, ?3)",
                params![collection.to_string(), id, serde_json::to_string(&fields)?],
            )?;
        }
        self.publish(collection, &id);
        Ok(id)
    }

    fn set(&self, path: &DocPath, fields: Fields) -> Result<()> {
        self.merge(path, fields, false)
    }

    fn update(&self, path: &DocPath, fields: Fields) -> Result<()> {
        self.merge(path, fields, true)
    }

    fn delete(&self, path: &DocPath) -> Result<()> {
        let removed = {
            let conn = lock(&self.conn);
            conn.execute(
                "DELETE FROM documents WHERE collection=?1 AND id=?2",
                params![path.parent().to_string(), path.id()],
            )?
        };
        if removed > 0 {
            self.publish(path.parent(), path.id());
        }
        Ok(())
    }

    fn read(&self, path: &DocPath) -> Result<Option<Document>> {
        let conn = lock(&self.conn);
        let raw: Option<String> = conn
            .query_row(
                "SELECT fields FROM documents WHERE collection=?1 AND id=?2",
                params![path.parent().to_string(), path.id()],
                |r| r.get(0),
            )
            .optional()?;
        match raw {
            Some(raw) => Ok(Some(Document::new(path.id(), serde_json::from_str(&raw)?))),
            None => Ok(None),
        }
    }

    fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>> {
        let conn = lock(&self.conn);
        let mut stmt =
            conn.prepare("SELECT id, fields FROM documents WHERE collection=?1 ORDER BY id")?;
        let rows = stmt.query_map(params![collection.to_string()], |r| {
            Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
        })?;
        let mut docs = Vec::new();
        for row in rows {
            let (id, raw) = row?;
            docs.push(Document::new(id, serde_json::from_str(&raw)?));
        }
        Ok(docs)
    }
}

fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS documents(
        collection TEXT NOT NULL,
        id TEXT NOT NULL,
        fields TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now')),
        PRIMARY KEY(collection, id)
    );
    CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
    "#,
    )?;
    Ok(())
}
