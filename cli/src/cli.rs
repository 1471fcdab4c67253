//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::commands;
use crate::commands::run::ScenariosFailed;
use crate::domain::{ConfigError, FlowError};
use crate::output::json::format_error;
use crate::infra::config::CONFIG_ENV;

/// Provision a deployment, exchange player credentials, connect, tear down
#[derive(Parser)]
#[command(
    name = "authflow",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Configuration file [default: ~/.authflow/config.yaml]
    #[arg(long, global = true, env = CONFIG_ENV, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a deployment, authenticate a player, connect, then stop it
    Run(commands::run::RunArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            config,
            command,
        } = self;
        let app = AppContext::new(AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            config,
        });
        let result = match command {
            Command::Run(args) => commands::run::run(&app, args).await,
            Command::Config(cmd) => commands::config::run(&app, &cmd),
            Command::Version => {
                commands::version::run(&app);
                Ok(())
            }
        };
        if let Err(e) = &result {
            if app.is_json() && e.downcast_ref::<ScenariosFailed>().is_none() {
                println!("{}", format_error(&format!("{e:#}"), error_code(e))?);
            }
        }
        result
    }
}

/// Machine-readable code for a command error.
#[must_use]
pub fn error_code(error: &anyhow::Error) -> &'static str {
    if let Some(e) = error.downcast_ref::<FlowError>() {
        return e.code();
    }
    if error.chain().any(|c| c.downcast_ref::<ConfigError>().is_some()) {
        return "invalid_config";
    }
    "error"
}
