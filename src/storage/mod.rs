//! Storage layer for userdb
//!
//! SQLite behind a fixed-size connection pool, with the `users` table as the
//! only persisted state.

pub mod patch;
pub mod pool;
pub mod schema;
pub mod users;

pub use patch::PatchStatement;
pub use pool::{ConnectionPool, PooledConnection};
pub use users::UserStore;
