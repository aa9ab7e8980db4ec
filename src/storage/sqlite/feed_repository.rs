use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row};
use uuid::Uuid;

use crate::domain::Feed;
use crate::errors::{GatorError, GatorResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::FeedRepository;

const FEED_COLUMNS: &str = "id, name, url, user_id, created_at, updated_at, last_fetched_at";

pub struct SqliteFeedRepository {
    storage: SqliteStorage,
}

impl SqliteFeedRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Feed> {
        Ok(Feed {
            id: row.get(0)?,
            name: row.get(1)?,
            url: row.get(2)?,
            user_id: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
            last_fetched_at: row.get(6)?,
        })
    }
}

impl FeedRepository for SqliteFeedRepository {
    fn create(&self, feed: &Feed) -> GatorResult<()> {
        let conn = self.storage.connection()?;
        conn.execute(
            "INSERT INTO feeds (id, name, url, user_id, created_at, updated_at, last_fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                &feed.id,
                &feed.name,
                &feed.url,
                &feed.user_id,
                &feed.created_at,
                &feed.updated_at,
                &feed.last_fetched_at,
            ),
        )
        .map_err(|e| {
            if GatorError::is_unique_violation(&e) {
                GatorError::Conflict(format!("feed {}", feed.url))
            } else {
                GatorError::from(e)
            }
        })?;

        tracing::debug!(feed = %feed.name, url = %feed.url, "created feed");
        Ok(())
    }

    fn get_by_url(&self, url: &str) -> GatorResult<Option<Feed>> {
        let conn = self.storage.connection()?;
        let feed = conn
            .query_row(
                &format!("SELECT {} FROM feeds WHERE url = ?1", FEED_COLUMNS),
                [url],
                Self::from_row,
            )
            .optional()?;
        Ok(feed)
    }

    fn list(&self) -> GatorResult<Vec<Feed>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM feeds ORDER BY created_at, rowid",
            FEED_COLUMNS
        ))?;

        let feeds = stmt.query_map([], Self::from_row)?;
        feeds.collect::<Result<Vec<_>, _>>().map_err(GatorError::from)
    }

    fn next_to_fetch(&self) -> GatorResult<Option<Feed>> {
        let conn = self.storage.connection()?;
        // Ties (e.g. several never-fetched feeds) go to the oldest feed, then insertion order
        let feed = conn
            .query_row(
                &format!(
                    "SELECT {} FROM feeds
                     ORDER BY last_fetched_at ASC NULLS FIRST, created_at ASC, rowid ASC
                     LIMIT 1",
                    FEED_COLUMNS
                ),
                [],
                Self::from_row,
            )
            .optional()?;
        Ok(feed)
    }

    fn mark_fetched(&self, id: Uuid, at: DateTime<Utc>) -> GatorResult<()> {
        let conn = self.storage.connection()?;
        let updated = conn.execute(
            "UPDATE feeds SET last_fetched_at = ?2, updated_at = ?2 WHERE id = ?1",
            (&id, &at),
        )?;

        if updated == 0 {
            return Err(GatorError::NotFound(format!("feed {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn setup_repo() -> SqliteFeedRepository {
        let storage = SqliteStorage::in_memory().unwrap();
        SqliteFeedRepository::new(storage)
    }

    fn feed(name: &str) -> Feed {
        Feed::new(
            name.to_string(),
            format!("https://{}.example.com/index.xml", name),
            None,
        )
    }

    #[test]
    fn test_create_and_get_feed() {
        let repo = setup_repo();
        let feed = feed("wagslane");

        repo.create(&feed).unwrap();

        let retrieved = repo.get_by_url(&feed.url).unwrap().unwrap();
        assert_eq!(retrieved.id, feed.id);
        assert_eq!(retrieved.name, "wagslane");
        assert!(retrieved.last_fetched_at.is_none());
        assert!(retrieved.user_id.is_none());
    }

    #[test]
    fn test_duplicate_url_rejected() {
        let repo = setup_repo();
        let first = feed("blog");
        repo.create(&first).unwrap();

        let second = Feed::new("Other name".to_string(), first.url.clone(), None);
        let result = repo.create(&second);

        assert!(matches!(result, Err(GatorError::Conflict(_))));
    }

    #[test]
    fn test_next_to_fetch_empty() {
        let repo = setup_repo();
        assert!(repo.next_to_fetch().unwrap().is_none());
    }

    #[test]
    fn test_next_to_fetch_prefers_never_fetched() {
        let repo = setup_repo();
        let now = Utc::now();

        let fetched = feed("fetched").with_last_fetched_at(Some(now - Duration::hours(1)));
        let fresh = feed("fresh");
        repo.create(&fetched).unwrap();
        repo.create(&fresh).unwrap();

        let next = repo.next_to_fetch().unwrap().unwrap();
        assert_eq!(next.id, fresh.id);
    }

    #[test]
    fn test_next_to_fetch_picks_oldest_timestamp() {
        let repo = setup_repo();
        let now = Utc::now();

        let recent = feed("recent").with_last_fetched_at(Some(now - Duration::minutes(5)));
        let stale = feed("stale").with_last_fetched_at(Some(now - Duration::days(2)));
        repo.create(&recent).unwrap();
        repo.create(&stale).unwrap();

        assert_eq!(repo.next_to_fetch().unwrap().unwrap().id, stale.id);
    }

    #[test]
    fn test_next_to_fetch_tie_breaks_by_insertion() {
        let repo = setup_repo();
        let first = feed("first");
        let mut second = feed("second");
        second.created_at = first.created_at;
        repo.create(&first).unwrap();
        repo.create(&second).unwrap();

        assert_eq!(repo.next_to_fetch().unwrap().unwrap().id, first.id);
    }

    #[test]
    fn test_mark_fetched_moves_cursor() {
        let repo = setup_repo();
        let a = feed("a");
        let b = feed("b");
        repo.create(&a).unwrap();
        repo.create(&b).unwrap();

        let at = Utc::now();
        repo.mark_fetched(a.id, at).unwrap();

        let a = repo.get_by_url(&a.url).unwrap().unwrap();
        assert_eq!(a.last_fetched_at, Some(at));
        assert_eq!(a.updated_at, at);
        assert_eq!(repo.next_to_fetch().unwrap().unwrap().id, b.id);
    }

    #[test]
    fn test_mark_fetched_unknown_feed() {
        let repo = setup_repo();
        let result = repo.mark_fetched(Uuid::new_v4(), Utc::now());
        assert!(matches!(result, Err(GatorError::NotFound(_))));
    }
}
