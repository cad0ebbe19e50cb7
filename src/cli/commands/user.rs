//! userdb user - Manage user records from the command line

use clap::{Args, Subcommand};
use colored::Colorize;

use crate::app::AppContext;
use crate::error::{Result, UserDbError};
use crate::model::{User, UserPatch};
use crate::storage::users::require_affected;

#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Create a user and print the stored record
    Create {
        first_name: String,
        last_name: String,
    },

    /// Show one user
    Get { id: String },

    /// List all users
    List,

    /// Replace both names of an existing user
    Update {
        id: String,
        first_name: String,
        last_name: String,
    },

    /// Change selected fields, e.g. '{"first_name": "Ada"}'
    Patch {
        id: String,
        /// JSON object mapping field name to new value
        data: String,
    },

    /// Delete a user (succeeds if the id does not exist)
    Delete { id: String },
}

pub fn run(ctx: &AppContext, args: &UserArgs) -> Result<()> {
    let store = &ctx.store;
    match &args.command {
        UserCommand::Create {
            first_name,
            last_name,
        } => {
            let id = store.create(&User::new(first_name, last_name))?;
            let user = store.get_by_id(&id)?;
            print_user(ctx, &user)
        }
        UserCommand::Get { id } => print_user(ctx, &store.get_by_id(id)?),
        UserCommand::List => print_users(ctx, &store.get_list()?),
        UserCommand::Update {
            id,
            first_name,
            last_name,
        } => {
            let affected = store.update(&User::new(first_name, last_name).with_id(id))?;
            require_affected(affected, id)?;
            print_user(ctx, &store.get_by_id(id)?)
        }
        UserCommand::Patch { id, data } => {
            let data: serde_json::Value = serde_json::from_str(data).map_err(|err| {
                UserDbError::InvalidArgument(format!("patch data is not valid JSON: {err}"))
            })?;
            let patch = UserPatch::from_json(id, data)?;
            require_affected(store.patch(&patch)?, id)?;
            print_user(ctx, &store.get_by_id(id)?)
        }
        UserCommand::Delete { id } => {
            store.delete(id)?;
            if ctx.machine {
                super::emit_json(&serde_json::json!({ "deleted": id }))
            } else {
                if !ctx.quiet {
                    println!("{} {}", "Deleted".red().bold(), id);
                }
                Ok(())
            }
        }
    }
}

fn print_user(ctx: &AppContext, user: &User) -> Result<()> {
    if ctx.machine {
        return super::emit_json(user);
    }
    if !ctx.quiet {
        println!("{}  {} {}", user.id.dimmed(), user.first_name.bold(), user.last_name);
    }
    Ok(())
}

fn print_users(ctx: &AppContext, users: &[User]) -> Result<()> {
    if ctx.machine {
        return super::emit_json(&users);
    }
    if ctx.quiet {
        return Ok(());
    }
    if users.is_empty() {
        println!("No users.");
        return Ok(());
    }
    for user in users {
        println!("{}  {} {}", user.id.dimmed(), user.first_name.bold(), user.last_name);
    }
    println!("\n{} users", users.len());
    Ok(())
}
