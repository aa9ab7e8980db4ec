use uuid::Uuid;

use crate::domain::{FeedFollow, FeedFollowView};
use crate::errors::{GatorError, GatorResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::FeedFollowRepository;

pub struct SqliteFeedFollowRepository {
    storage: SqliteStorage,
}

impl SqliteFeedFollowRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

impl FeedFollowRepository for SqliteFeedFollowRepository {
    fn create(&self, follow: &FeedFollow) -> GatorResult<()> {
        let conn = self.storage.connection()?;
        conn.execute(
            "INSERT INTO feed_follows (id, user_id, feed_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                &follow.id,
                &follow.user_id,
                &follow.feed_id,
                &follow.created_at,
                &follow.updated_at,
            ),
        )
        .map_err(|e| {
            if GatorError::is_unique_violation(&e) {
                GatorError::Conflict(format!(
                    "user {} already follows feed {}",
                    follow.user_id, follow.feed_id
                ))
            } else if is_foreign_key_violation(&e) {
                GatorError::NotFound(format!(
                    "user {} or feed {}",
                    follow.user_id, follow.feed_id
                ))
            } else {
                GatorError::from(e)
            }
        })?;

        Ok(())
    }

    fn delete_by_user_name_and_url(&self, user_name: &str, url: &str) -> GatorResult<()> {
        let conn = self.storage.connection()?;
        let deleted = conn.execute(
            "DELETE FROM feed_follows
             WHERE user_id = (SELECT id FROM users WHERE name = ?1)
               AND feed_id = (SELECT id FROM feeds WHERE url = ?2)",
            (user_name, url),
        )?;

        if deleted == 0 {
            return Err(GatorError::NotFound(format!(
                "{} does not follow {}",
                user_name, url
            )));
        }
        Ok(())
    }

    fn list_for_user(&self, user_id: Uuid) -> GatorResult<Vec<FeedFollowView>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(
            "SELECT ff.id, ff.user_id, ff.feed_id, ff.created_at, ff.updated_at,
                    users.name, feeds.name, feeds.url
             FROM feed_follows ff
             INNER JOIN users ON users.id = ff.user_id
             INNER JOIN feeds ON feeds.id = ff.feed_id
             WHERE ff.user_id = ?1
             ORDER BY ff.created_at, ff.rowid",
        )?;

        let follows = stmt.query_map([user_id], |row| {
            Ok(FeedFollowView {
                follow: FeedFollow {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    feed_id: row.get(2)?,
                    created_at: row.get(3)?,
                    updated_at: row.get(4)?,
                },
                user_name: row.get(5)?,
                feed_name: row.get(6)?,
                feed_url: row.get(7)?,
            })
        })?;

        follows.collect::<Result<Vec<_>, _>>().map_err(GatorError::from)
    }
}
