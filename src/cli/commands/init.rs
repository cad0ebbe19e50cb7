//! userdb init - Create the database file and schema

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct InitArgs {}

pub fn run(ctx: &AppContext, _args: &InitArgs) -> Result<()> {
    // Opening the pool already created the file and table.
    let path = ctx.config.database.path.display().to_string();
    let users = ctx.store.get_list()?.len();

    if ctx.machine {
        return super::emit_json(&serde_json::json!({
            "status": "ok",
            "database": path,
            "users": users,
        }));
    }

    if !ctx.quiet {
        println!("{} database at {}", "Initialized".green().bold(), path);
        println!("{users} existing users");
    }
    Ok(())
}
