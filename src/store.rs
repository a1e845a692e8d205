use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

/// Current document-store schema version. Bump together with a migration
/// arm in `migrate`.
const SCHEMA_VERSION: i64 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt document under {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unencodable document under {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistent local key-value store of named JSON documents.
///
/// Each entity collection lives under its own key as one JSON array; a
/// write replaces the whole document. The store itself is synchronous;
/// repositories put the async boundary in front of it.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) the store inside a workspace directory.
    pub fn open(workspace: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(workspace)?;
        let conn = Connection::open(workspace.join("scholar.sqlite3"))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        Ok(store)
    }

    /// In-memory store, used by tests for isolated parallel instances.
    pub fn in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<(), StoreError> {
        let conn = self.lock();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS documents(
                key TEXT PRIMARY KEY,
                doc TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS meta(
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        migrate(&conn)?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        // A poisoned mutex means a panic mid-write; nothing sensible to
        // salvage, so propagate the panic.
        self.conn.lock().expect("store mutex poisoned")
    }

    /// Read one collection. A missing key is an empty collection, a
    /// present-but-unparsable document is a storage fault.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        let conn = self.lock();
        let doc: Option<String> = conn
            .query_row("SELECT doc FROM documents WHERE key = ?", [key], |r| {
                r.get(0)
            })
            .optional()?;
        match doc {
            None => Ok(Vec::new()),
            Some(doc) => serde_json::from_str(&doc).map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            }),
        }
    }

    /// Replace one collection wholesale. Last writer wins.
    pub fn write<T: Serialize>(&self, key: &str, collection: &[T]) -> Result<(), StoreError> {
        let doc = serde_json::to_string(collection).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        let conn = self.lock();
        conn.execute(
            "INSERT INTO documents(key, doc) VALUES(?, ?)
             ON CONFLICT(key) DO UPDATE SET doc = excluded.doc",
            (key, &doc),
        )?;
        debug!(key, bytes = doc.len(), "wrote collection");
        Ok(())
    }

    /// Install a bundled default document unless the key already holds
    /// one. An existing document is left untouched: no merge, no version
    /// check.
    pub fn seed_if_absent(&self, key: &str, default_doc: &str) -> Result<(), StoreError> {
        let conn = self.lock();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO documents(key, doc) VALUES(?, ?)",
            (key, default_doc),
        )?;
        if inserted > 0 {
            debug!(key, "seeded default collection");
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn schema_version(&self) -> Result<i64, StoreError> {
        let conn = self.lock();
        Ok(read_schema_version(&conn)?)
    }
}

fn read_schema_version(conn: &Connection) -> rusqlite::Result<i64> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM meta WHERE key = 'schema_version'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v.and_then(|s| s.parse().ok()).unwrap_or(0))
}

/// Stamp and upgrade the document schema. Pre-versioned stores (version
/// 0) carry the v1 document shapes already, so v0 -> v1 is a stamp only.
/// Future shape changes get their own arms here.
fn migrate(conn: &Connection) -> Result<(), StoreError> {
    let current = read_schema_version(conn)?;
    if current < SCHEMA_VERSION {
        conn.execute(
            "INSERT INTO meta(key, value) VALUES('schema_version', ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [SCHEMA_VERSION.to_string()],
        )?;
    }
    Ok(())
}
