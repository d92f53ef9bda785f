use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};

use super::{violation, SqliteStorage, Violation};
use crate::domain::{Document, Feed, FeedType};
use crate::errors::{BaleenError, BaleenResult};
use crate::storage::traits::FeedRepository;

const COLUMNS: &str = "id, type, title, xmlurl, htmlurl, category, created, updated";

pub struct SqliteFeedRepository {
    storage: SqliteStorage,
}

impl SqliteFeedRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Feed> {
        let feed_type: String = row.get(1)?;
        let feed_type = feed_type
            .parse::<FeedType>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;

        Ok(Feed {
            id: Some(row.get(0)?),
            feed_type,
            title: row.get(2)?,
            xmlurl: row.get(3)?,
            htmlurl: row.get(4)?,
            category: row.get(5)?,
            created: row.get(6)?,
            updated: row.get(7)?,
        })
    }

    fn find_one(&self, clause: &str, value: &dyn rusqlite::ToSql) -> BaleenResult<Option<Feed>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM feeds WHERE {}", COLUMNS, clause))?;
        let feed = stmt.query_row([value], Self::from_row).optional()?;
        Ok(feed)
    }

    fn write_error(err: rusqlite::Error, feed: &Feed) -> BaleenError {
        match violation(&err) {
            Some(Violation::Unique(field)) => {
                let value = match field.as_str() {
                    "xmlurl" => feed.xmlurl.clone(),
                    _ => String::new(),
                };
                BaleenError::Uniqueness {
                    collection: Feed::COLLECTION,
                    field,
                    value,
                }
            }
            _ => BaleenError::Database(err),
        }
    }
}

impl FeedRepository for SqliteFeedRepository {
    fn save(&self, feed: &mut Feed) -> BaleenResult<i64> {
        let conn = self.storage.connection()?;
        let mut prepared = feed.clone();
        let now = Utc::now();

        // The stored creation time wins over whatever the caller holds
        if let Some(id) = prepared.id {
            let created: Option<DateTime<Utc>> = conn
                .query_row("SELECT created FROM feeds WHERE id = ?1", [id], |row| row.get(0))
                .optional()?;
            prepared.created = created.ok_or(BaleenError::NotFound {
                collection: Feed::COLLECTION,
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
                    "INSERT INTO feeds (type, title, xmlurl, htmlurl, category, created, updated) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        prepared.feed_type.as_str(),
                        prepared.title,
                        prepared.xmlurl,
                        prepared.htmlurl,
                        prepared.category,
                        prepared.created,
                        prepared.updated,
                    ],
                )
                .map_err(|e| Self::write_error(e, &prepared))?;
                conn.last_insert_rowid()
            }
            Some(id) => {
                conn.execute(
                    "UPDATE feeds SET type = ?1, title = ?2, xmlurl = ?3, htmlurl = ?4, category = ?5, updated = ?6 WHERE id = ?7",
                    params![
                        prepared.feed_type.as_str(),
                        prepared.title,
                        prepared.xmlurl,
                        prepared.htmlurl,
                        prepared.category,
                        prepared.updated,
                        id,
                    ],
                )
                .map_err(|e| Self::write_error(e, &prepared))?;
                id
            }
        };

        prepared.id = Some(id);
        *feed = prepared;
        tracing::debug!(id, xmlurl = %feed.xmlurl, "Saved feed");

        Ok(id)
    }

    fn remove(&self, id: i64) -> BaleenResult<()> {
        let conn = self.storage.connection()?;
        let removed = conn
            .execute("DELETE FROM feeds WHERE id = ?1", [id])
            .map_err(|e| match violation(&e) {
                Some(Violation::ForeignKey) => BaleenError::FeedInUse(id),
                _ => BaleenError::Database(e),
            })?;

        if removed == 0 {
            return Err(BaleenError::NotFound {
                collection: Feed::COLLECTION,
                id,
            });
        }
        tracing::debug!(id, "Removed feed");
        Ok(())
    }

    fn get_all(&self) -> BaleenResult<Vec<Feed>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM feeds ORDER BY id", COLUMNS))?;
        let feeds = stmt.query_map([], Self::from_row)?;

        feeds.collect::<Result<Vec<_>, _>>().map_err(BaleenError::from)
    }

    fn get_by_id(&self, id: i64) -> BaleenResult<Option<Feed>> {
        self.find_one("id = ?1", &id)
    }

    fn get_by_xmlurl(&self, xmlurl: &str) -> BaleenResult<Option<Feed>> {
        self.find_one("xmlurl = ?1", &xmlurl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;

    fn setup_repo() -> SqliteFeedRepository {
        let storage = SqliteStorage::in_memory().unwrap();
        SqliteFeedRepository::new(storage)
    }

    fn feed(xmlurl: &str) -> Feed {
        Feed::new(xmlurl.to_string(), "tech".to_string())
    }

    #[test]
    fn test_save_and_get_feed() {
        let repo = setup_repo();
        let mut feed = feed("https://example.com/feed")
            .with_type(FeedType::Atom)
            .with_title(Some("Example Feed".to_string()))
            .with_htmlurl(Some("https://example.com".to_string()));

        let id = repo.save(&mut feed).unwrap();
        assert!(id > 0);
        assert_eq!(feed.id, Some(id));

        let retrieved = repo.get_by_id(id).unwrap().unwrap();
        assert_eq!(retrieved, feed);
        assert_eq!(retrieved.feed_type, FeedType::Atom);
        assert_eq!(retrieved.htmlurl.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_duplicate_xmlurl_rejected() {
        let repo = setup_repo();
        repo.save(&mut feed("https://example.com/feed")).unwrap();

        let mut duplicate = feed("https://example.com/feed");
        let result = repo.save(&mut duplicate);

        match result {
            Err(BaleenError::Uniqueness {
                collection,
                field,
                value,
            }) => {
                assert_eq!(collection, "feeds");
                assert_eq!(field, "xmlurl");
                assert_eq!(value, "https://example.com/feed");
            }
            other => panic!("expected uniqueness violation, got {:?}", other),
        }
        assert_eq!(duplicate.id, None);
        assert_eq!(repo.get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_feed_not_persisted() {
        let repo = setup_repo();
        let mut invalid = feed("not-a-url");
        let before = invalid.clone();

        let result = repo.save(&mut invalid);

        assert!(matches!(
            result,
            Err(BaleenError::Validation(ValidationError::InvalidUrl { .. }))
        ));
        assert_eq!(invalid, before);
        assert!(repo.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_update_keeps_created_and_advances_updated() {
        let repo = setup_repo();
        let mut feed = feed("https://example.com/feed");
        let id = repo.save(&mut feed).unwrap();
        let created = feed.created;
        let first_updated = feed.updated;

        feed.title = Some("Renamed".to_string());
        feed.created = created + chrono::Duration::days(1);
        repo.save(&mut feed).unwrap();

        let stored = repo.get_by_id(id).unwrap().unwrap();
        assert_eq!(stored.title.as_deref(), Some("Renamed"));
        assert_eq!(stored.created, created);
        assert_eq!(feed.created, created);
        assert!(stored.updated >= first_updated);
        assert!(stored.updated >= stored.created);
    }

    #[test]
    fn test_save_resets_hand_set_updated() {
        let repo = setup_repo();
        let mut feed = feed("https://example.com/feed");
        let id = repo.save(&mut feed).unwrap();

        feed.updated = Utc::now() + chrono::Duration::days(365 * 100);
        let before = Utc::now();
        repo.save(&mut feed).unwrap();
        let after = Utc::now();

        let stored = repo.get_by_id(id).unwrap().unwrap();
        assert!(stored.updated >= before);
        assert!(stored.updated <= after);
        assert_eq!(feed.updated, stored.updated);
    }

    #[test]
    fn test_insert_clamps_future_created() {
        let repo = setup_repo();
        let mut feed = feed("https://example.com/feed");
        feed.created = Utc::now() + chrono::Duration::days(10);
        feed.updated = feed.created;

        let id = repo.save(&mut feed).unwrap();
        let after = Utc::now();

        let stored = repo.get_by_id(id).unwrap().unwrap();
        assert!(stored.created <= after);
        assert!(stored.updated <= after);
        assert_eq!(stored.created, stored.updated);
    }

    #[test]
    fn test_update_missing_record() {
        let repo = setup_repo();
        let mut ghost = feed("https://example.com/feed");
        ghost.id = Some(99);

        assert!(matches!(
            repo.save(&mut ghost),
            Err(BaleenError::NotFound { collection: "feeds", id: 99 })
        ));
    }

    #[test]
    fn test_remove_feed() {
        let repo = setup_repo();
        let id = repo.save(&mut feed("https://example.com/feed")).unwrap();

        repo.remove(id).unwrap();

        assert!(repo.get_by_id(id).unwrap().is_none());
        assert!(matches!(
            repo.remove(id),
            Err(BaleenError::NotFound { .. })
        ));
    }

    #[test]
    fn test_get_all_feeds() {
        let repo = setup_repo();
        repo.save(&mut feed("https://example1.com/feed")).unwrap();
        repo.save(&mut feed("https://example2.com/feed").with_type(FeedType::Json))
            .unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].xmlurl, "https://example1.com/feed");
        assert_eq!(all[1].feed_type, FeedType::Json);
    }

    #[test]
    fn test_get_by_xmlurl() {
        let repo = setup_repo();

        assert!(repo.get_by_xmlurl("https://example.com/feed").unwrap().is_none());

        repo.save(&mut feed("https://example.com/feed")).unwrap();

        let found = repo.get_by_xmlurl("https://example.com/feed").unwrap().unwrap();
        assert_eq!(found.category, "tech");
    }
}
