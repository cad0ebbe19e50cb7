//! userdb - user records over a JSON HTTP interface backed by SQLite.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use userdb::Result;
use userdb::app::AppContext;
use userdb::cli::Cli;
use userdb::config::{Config, LogFormat};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.machine {
                let error_json = serde_json::json!({
                    "error": true,
                    "details": e.to_structured(),
                });
                println!("{}", serde_json::to_string(&error_json).unwrap_or_default());
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = AppContext::load_config(cli)?;
    init_tracing(cli, &config);
    let ctx = AppContext::new(cli, config)?;
    userdb::cli::commands::run(&ctx, &cli.command)
}

fn init_tracing(cli: &Cli, config: &Config) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => format!("warn,userdb={}", config.logging.level),
        1 => "info,userdb=debug".to_string(),
        2 => "debug,userdb=trace".to_string(),
        _ => "trace".to_string(),
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.machine || config.logging.format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
