//! User storage engine.
//!
//! Each method is one round trip against a pooled connection. Nothing is
//! cached between calls and nothing is retried; concurrent writers to the
//! same row are serialized by SQLite itself.

use std::sync::Arc;

use rusqlite::{OptionalExtension, Row, params};
use tracing::{debug, warn};

use crate::error::{Result, UserDbError};
use crate::model::{User, UserPatch};
use crate::storage::patch::PatchStatement;
use crate::storage::pool::ConnectionPool;

const SELECT_USER: &str = "SELECT id, first_name, last_name FROM users";

#[derive(Debug, Clone)]
pub struct UserStore {
    pool: Arc<ConnectionPool>,
}

impl UserStore {
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    pub const fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }

    /// Insert a new row and return the identifier the store assigned.
    /// `user.id` is ignored.
    pub fn create(&self, user: &User) -> Result<String> {
        let conn = self.pool.get()?;
        let id: String = conn
            .query_row(
                "INSERT INTO users (first_name, last_name) VALUES (?1, ?2) RETURNING id",
                params![user.first_name, user.last_name],
                |row| row.get(0),
            )
            .map_err(UserDbError::from)
            .inspect_err(|err| warn!(error = %err, "create failed"))?;

        debug!(%id, "created user");
        Ok(id)
    }

    /// Fetch one user. Zero matching rows is `NotFound`.
    pub fn get_by_id(&self, id: &str) -> Result<User> {
        let conn = self.pool.get()?;
        let user = conn
            .query_row(&format!("{SELECT_USER} WHERE id = ?1"), [id], user_from_row)
            .optional()
            .map_err(UserDbError::from)
            .inspect_err(|err| warn!(%id, error = %err, "get_by_id failed"))?;

        user.ok_or_else(|| UserDbError::NotFound(id.to_string()))
    }

    /// All users in insertion order. An empty table yields an empty list.
    pub fn get_list(&self) -> Result<Vec<User>> {
        let conn = self.pool.get()?;
        let scan = || -> rusqlite::Result<Vec<User>> {
            let mut stmt = conn.prepare(&format!("{SELECT_USER} ORDER BY rowid"))?;
            let rows = stmt.query_map([], user_from_row)?;
            rows.collect()
        };
        let users = scan()
            .map_err(UserDbError::from)
            .inspect_err(|err| warn!(error = %err, "get_list failed"))?;

        debug!(count = users.len(), "listed users");
        Ok(users)
    }

    /// Replace both names of the row matching `user.id`.
    ///
    /// Returns rows affected; `0` means no such id and is left to the caller
    /// to interpret. An empty `user.id` is `InvalidArgument`.
    pub fn update(&self, user: &User) -> Result<usize> {
        require_id(&user.id)?;
        let conn = self.pool.get()?;
        let affected = conn
            .execute(
                "UPDATE users SET first_name = ?2, last_name = ?3 WHERE id = ?1",
                params![user.id, user.first_name, user.last_name],
            )
            .map_err(UserDbError::from)
            .inspect_err(|err| warn!(id = %user.id, error = %err, "update failed"))?;

        debug!(id = %user.id, affected, "updated user");
        Ok(affected)
    }

    /// Apply a partial update. Keys are validated before a connection is
    /// checked out, so an invalid patch never touches the store.
    ///
    /// Returns rows affected, with the same contract as [`Self::update`].
    pub fn patch(&self, patch: &UserPatch) -> Result<usize> {
        let stmt = PatchStatement::build(patch)?;
        let sql = stmt.sql();

        let conn = self.pool.get()?;
        let affected = conn
            .execute(&sql, stmt.params().as_slice())
            .map_err(UserDbError::from)
            .inspect_err(|err| warn!(id = %patch.id, error = %err, "patch failed"))?;

        debug!(id = %patch.id, fields = stmt.fields().count(), affected, "patched user");
        Ok(affected)
    }

    /// Remove the row if present. Deleting a missing id is not an error.
    pub fn delete(&self, id: &str) -> Result<()> {
        let conn = self.pool.get()?;
        let affected = conn
            .execute("DELETE FROM users WHERE id = ?1", [id])
            .map_err(UserDbError::from)
            .inspect_err(|err| warn!(%id, error = %err, "delete failed"))?;

        debug!(%id, affected, "deleted user");
        Ok(())
    }
}

/// Caller-side reading of a rows-affected count from `update`/`patch`:
/// zero means the id does not exist.
pub fn require_affected(affected: usize, id: &str) -> Result<()> {
    if affected == 0 {
        return Err(UserDbError::NotFound(id.to_string()));
    }
    Ok(())
}

/// Update-style operations need a target; an absent id is a malformed
/// request rather than a miss.
pub(crate) fn require_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(UserDbError::InvalidArgument(
            "id is required and must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
    })
}
