//! SQLite connection pool
//!
//! An `r2d2` pool over `r2d2_sqlite`. Every connection gets the same
//! pragmas when it is opened; the pool is shared behind an `Arc`.

use std::fs;
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::storage::schema;

/// A checked-out connection. Returned to the pool on drop.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

pub struct ConnectionPool {
    inner: Pool<SqliteConnectionManager>,
    location: String,
}

impl std::fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state();
        f.debug_struct("ConnectionPool")
            .field("location", &self.location)
            .field("size", &self.inner.max_size())
            .field("idle", &state.idle_connections)
            .finish_non_exhaustive()
    }
}

impl ConnectionPool {
    /// Open `pool_size` connections to the configured database file and make
    /// sure the schema exists.
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        let path = &config.path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            Self::configure_pragmas(conn)
        });

        let inner = Pool::builder()
            .max_size(config.pool_size.max(1))
            .connection_timeout(Duration::from_millis(config.acquire_timeout_ms.max(1)))
            .build(manager)?;

        let pool = Self {
            inner,
            location: path.display().to_string(),
        };
        schema::ensure_schema(&*pool.get()?)?;

        info!(path = %path.display(), size = pool.size(), "opened database pool");
        Ok(pool)
    }

    /// Single-connection pool over a private in-memory database.
    ///
    /// The connection is never retired, since recycling it would drop the
    /// database with it.
    pub fn open_in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory()
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

        let inner = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_timeout(Duration::from_millis(
                DatabaseConfig::default().acquire_timeout_ms,
            ))
            .build(manager)?;

        let pool = Self {
            inner,
            location: ":memory:".to_string(),
        };
        schema::ensure_schema(&*pool.get()?)?;
        Ok(pool)
    }

    /// Check out a connection, waiting up to the acquire timeout for one to
    /// be returned. Timing out is `StoreUnavailable`.
    pub fn get(&self) -> Result<PooledConnection> {
        Ok(self.inner.get()?)
    }

    pub fn size(&self) -> u32 {
        self.inner.max_size()
    }

    /// Connections not currently checked out.
    pub fn idle_count(&self) -> u32 {
        self.inner.state().idle_connections
    }

    fn configure_pragmas(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )
    }
}
