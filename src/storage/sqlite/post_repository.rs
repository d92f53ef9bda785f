use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{violation, SqliteStorage, Violation};
use crate::domain::{Document, Post};
use crate::errors::{BaleenError, BaleenResult, ValidationError};
use crate::storage::traits::PostRepository;

const COLUMNS: &str = "id, feed, title, url, pubdate, content, signature, created, updated";

pub struct SqlitePostRepository {
    storage: SqliteStorage,
}

impl SqlitePostRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
        Ok(Post {
            id: Some(row.get(0)?),
            feed: row.get(1)?,
            title: row.get(2)?,
            url: row.get(3)?,
            pubdate: row.get(4)?,
            content: row.get(5)?,
            signature: row.get(6)?,
            created: row.get(7)?,
            updated: row.get(8)?,
        })
    }

    fn find_one(&self, clause: &str, value: &dyn rusqlite::ToSql) -> BaleenResult<Option<Post>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM posts WHERE {}", COLUMNS, clause))?;
        let post = stmt.query_row([value], Self::from_row).optional()?;
        Ok(post)
    }

    fn write_error(err: rusqlite::Error, post: &Post) -> BaleenError {
        match violation(&err) {
            Some(Violation::Unique(field)) => {
                let value = match field.as_str() {
                    "url" => post.url.clone(),
                    "signature" => post.signature.clone(),
                    _ => String::new(),
                };
                BaleenError::Uniqueness {
                    collection: Post::COLLECTION,
                    field,
                    value,
                }
            }
            Some(Violation::ForeignKey) => match post.feed {
                Some(id) => ValidationError::UnknownReference { field: "feed", id }.into(),
                None => BaleenError::Database(err),
            },
            None => BaleenError::Database(err),
        }
    }
}

impl PostRepository for SqlitePostRepository {
    fn save(&self, post: &mut Post) -> BaleenResult<i64> {
        let conn = self.storage.connection()?;
        let mut prepared = post.clone();
        let now = Utc::now();

        // The stored creation time wins over whatever the caller holds
        if let Some(id) = prepared.id {
            let created: Option<DateTime<Utc>> = conn
                .query_row("SELECT created FROM posts WHERE id = ?1", [id], |row| row.get(0))
                .optional()?;
            prepared.created = created.ok_or(BaleenError::NotFound {
                collection: Post::COLLECTION,
                id,
            })?;
        } else {
            // A new record cannot have been created after its first write
            prepared.created = prepared.created.min(now);
        }

        // Only a stored creation time can be ahead of the clock here
        prepared.prepare(now.max(prepared.created));
        prepared.validate()?;

        let id = match prepared.id {
            None => {
                conn.execute(
                    "INSERT INTO posts (feed, title, url, pubdate, content, signature, created, updated) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        prepared.feed,
                        prepared.title,
                        prepared.url,
                        prepared.pubdate,
                        prepared.content,
                        prepared.signature,
                        prepared.created,
                        prepared.updated,
                    ],
                )
                .map_err(|e| Self::write_error(e, &prepared))?;
                conn.last_insert_rowid()
            }
            Some(id) => {
                conn.execute(
                    "UPDATE posts SET feed = ?1, title = ?2, url = ?3, pubdate = ?4, content = ?5, signature = ?6, updated = ?7 WHERE id = ?8",
                    params![
                        prepared.feed,
                        prepared.title,
                        prepared.url,
                        prepared.pubdate,
                        prepared.content,
                        prepared.signature,
                        prepared.updated,
                        id,
                    ],
                )
                .map_err(|e| Self::write_error(e, &prepared))?;
                id
            }
        };

        prepared.id = Some(id);
        *post = prepared;
        tracing::debug!(id, url = %post.url, signature = %post.signature, "Saved post");

        Ok(id)
    }

    fn remove(&self, id: i64) -> BaleenResult<()> {
        let conn = self.storage.connection()?;
        let removed = conn.execute("DELETE FROM posts WHERE id = ?1", [id])?;

        if removed == 0 {
            return Err(BaleenError::NotFound {
                collection: Post::COLLECTION,
                id,
            });
        }
        tracing::debug!(id, "Removed post");
        Ok(())
    }

    fn get_by_id(&self, id: i64) -> BaleenResult<Option<Post>> {
        self.find_one("id = ?1", &id)
    }

    fn get_by_url(&self, url: &str) -> BaleenResult<Option<Post>> {
        self.find_one("url = ?1", &url)
    }

    fn get_by_signature(&self, signature: &str) -> BaleenResult<Option<Post>> {
        self.find_one("signature = ?1", &signature)
    }

    fn get_for_feed(&self, feed_id: i64) -> BaleenResult<Vec<Post>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM posts WHERE feed = ?1 ORDER BY pubdate DESC, id DESC",
            COLUMNS
        ))?;
        let posts = stmt.query_map([feed_id], Self::from_row)?;

        posts.collect::<Result<Vec<_>, _>>().map_err(BaleenError::from)
    }
}
