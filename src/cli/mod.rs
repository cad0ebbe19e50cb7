//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;

/// userdb - user records over HTTP, backed by SQLite
#[derive(Parser, Debug)]
#[command(name = "userdb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Emit machine-readable JSON output (and JSON logs)
    #[arg(long, short = 'm', global = true)]
    pub machine: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ./userdb.toml, then ~/.config/userdb/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file (overrides config)
    #[arg(long, global = true, value_name = "PATH")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database file and users table
    Init(commands::init::InitArgs),

    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),

    /// Create, read, update, patch or delete users
    User(commands::user::UserArgs),
}
