//! Application context shared by CLI commands.

use std::sync::Arc;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::storage::{ConnectionPool, UserStore};

/// Loaded config plus a ready storage engine.
#[derive(Debug)]
pub struct AppContext {
    pub config: Config,
    pub store: UserStore,
    pub machine: bool,
    pub quiet: bool,
}

impl AppContext {
    /// Load config for `cli`, applying the `--database` override.
    pub fn load_config(cli: &Cli) -> Result<Config> {
        let cwd = std::env::current_dir()?;
        let mut config = Config::load(cli.config.as_deref(), &cwd)?;
        if let Some(path) = &cli.database {
            config.database.path.clone_from(path);
        }
        Ok(config)
    }

    /// Open the connection pool described by `config`.
    pub fn new(cli: &Cli, config: Config) -> Result<Self> {
        let pool = ConnectionPool::open(&config.database)?;
        Ok(Self {
            store: UserStore::new(Arc::new(pool)),
            config,
            machine: cli.machine,
            quiet: cli.quiet,
        })
    }
}
