//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use serde::Serialize;

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;

pub mod init;
pub mod serve;
pub mod user;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Init(args) => init::run(ctx, args),
        Commands::Serve(args) => serve::run(ctx, args),
        Commands::User(args) => user::run(ctx, args),
    }
}

/// Print a value as a single JSON line on stdout.
pub(crate) fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
