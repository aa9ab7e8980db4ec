use rusqlite::{OptionalExtension, Row};
use uuid::Uuid;

use crate::domain::User;
use crate::errors::{GatorError, GatorResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::UserRepository;

pub struct SqliteUserRepository {
    storage: SqliteStorage,
}

impl SqliteUserRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
        })
    }
}

impl UserRepository for SqliteUserRepository {
    fn create(&self, user: &User) -> GatorResult<()> {
        let conn = self.storage.connection()?;
        conn.execute(
            "INSERT INTO users (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            (&user.id, &user.name, &user.created_at, &user.updated_at),
        )
        .map_err(|e| {
            if GatorError::is_unique_violation(&e) {
                GatorError::Conflict(format!("user {}", user.name))
            } else {
                GatorError::from(e)
            }
        })?;

        tracing::debug!(user = %user.name, "created user");
        Ok(())
    }

    fn get_by_name(&self, name: &str) -> GatorResult<Option<User>> {
        let conn = self.storage.connection()?;
        let user = conn
            .query_row(
                "SELECT id, name, created_at, updated_at FROM users WHERE name = ?1",
                [name],
                Self::from_row,
            )
            .optional()?;
        Ok(user)
    }

    fn get_by_id(&self, id: Uuid) -> GatorResult<Option<User>> {
        let conn = self.storage.connection()?;
        let user = conn
            .query_row(
                "SELECT id, name, created_at, updated_at FROM users WHERE id = ?1",
                [id],
                Self::from_row,
            )
            .optional()?;
        Ok(user)
    }

    fn list(&self) -> GatorResult<Vec<User>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, created_at, updated_at FROM users ORDER BY created_at, name",
        )?;

        let users = stmt.query_map([], Self::from_row)?;
        users.collect::<Result<Vec<_>, _>>().map_err(GatorError::from)
    }

    fn reset(&self) -> GatorResult<()> {
        let conn = self.storage.connection()?;
        let deleted = conn.execute("DELETE FROM users", [])?;
        tracing::debug!(deleted, "reset users");
        Ok(())
    }
}
