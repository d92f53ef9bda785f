use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::{ConnectOptions, DatabaseSettings};
use crate::errors::{BaleenError, BaleenResult};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS feeds (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    type TEXT NOT NULL DEFAULT 'rss' CHECK (type IN ('rss', 'atom', 'xml', 'json')),
    title TEXT CHECK (title IS NULL OR length(title) <= 256),
    xmlurl TEXT NOT NULL UNIQUE,
    htmlurl TEXT,
    category TEXT NOT NULL,
    created TEXT NOT NULL,
    updated TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    feed INTEGER REFERENCES feeds(id),
    title TEXT CHECK (title IS NULL OR length(title) <= 512),
    url TEXT NOT NULL UNIQUE,
    pubdate TEXT,
    content TEXT NOT NULL,
    signature TEXT NOT NULL UNIQUE CHECK (length(signature) = 64),
    created TEXT NOT NULL,
    updated TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_posts_feed ON posts(feed);
"#;

#[derive(Clone)]
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
    location: String,
}

impl SqliteStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> BaleenResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )
        .map_err(|e| BaleenError::Connection(format!("{}: {}", path.display(), e)))?;

        Self::init(conn, path.display().to_string())
    }

    pub fn in_memory() -> BaleenResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| BaleenError::Connection(format!(":memory:: {}", e)))?;

        Self::init(conn, ":memory:".to_string())
    }

    fn init(conn: Connection, location: String) -> BaleenResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location,
        })
    }

    /// Path of the database file, or `:memory:`
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>, BaleenError> {
        self.conn
            .lock()
            .map_err(|_| BaleenError::Connection("store lock poisoned".to_string()))
    }
}

/// Database file for resolved settings: `<host>/<name>.db`
pub fn database_path(settings: &DatabaseSettings) -> PathBuf {
    Path::new(&settings.host).join(format!("{}.db", settings.name))
}

/// Open the store named by `settings`, with `options` overriding any of
/// name, host or port. One attempt is made; nothing is retried.
pub fn connect(settings: &DatabaseSettings, options: &ConnectOptions) -> BaleenResult<SqliteStorage> {
    let resolved = settings.resolve(options);

    if resolved.name.trim().is_empty() || resolved.name.contains(['/', '\\']) {
        return Err(BaleenError::Connection(format!(
            "invalid database name: {:?}",
            resolved.name
        )));
    }

    let path = database_path(&resolved);
    tracing::debug!(
        name = %resolved.name,
        host = %resolved.host,
        port = resolved.port,
        "Connecting to store"
    );

    let storage = SqliteStorage::new(&path)?;
    tracing::info!(location = %storage.location(), "Connected to store");
    Ok(storage)
}
