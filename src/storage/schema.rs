//! Table bootstrap

use rusqlite::Connection;

use crate::error::{Result, UserDbError};

const USERS_TABLE: &str = include_str!("../../schema/users.sql");

/// Create the `users` table if it does not exist yet.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(USERS_TABLE)
        .map_err(|err| UserDbError::StoreUnavailable(format!("create users table: {err}")))
}
