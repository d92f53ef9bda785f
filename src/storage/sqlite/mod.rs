mod connection;
mod feed_repository;
mod post_repository;

pub use connection::{connect, database_path, SqliteStorage};
pub use feed_repository::SqliteFeedRepository;
pub use post_repository::SqlitePostRepository;

use rusqlite::ffi;

/// Constraint a failed statement ran into
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Violation {
    /// Column named by a UNIQUE index
    Unique(String),
    ForeignKey,
}

pub(crate) fn violation(err: &rusqlite::Error) -> Option<Violation> {
    match err {
        rusqlite::Error::SqliteFailure(e, message)
            if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            // "UNIQUE constraint failed: posts.signature"
            let column = message
                .as_deref()
                .and_then(|m| m.rsplit('.').next())
                .unwrap_or("unknown")
                .trim()
                .to_string();
            Some(Violation::Unique(column))
        }
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
            Some(Violation::ForeignKey)
        }
        _ => None,
    }
}
