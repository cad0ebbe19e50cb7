pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod storage;

pub use error::{Result, UserDbError};
pub use model::{PatchValue, User, UserField, UserPatch};
pub use storage::{ConnectionPool, UserStore};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
