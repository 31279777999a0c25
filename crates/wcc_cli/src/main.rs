//! WAV Channel Combiner - terminal front end.
//!
//! Startup order: settings, logging, then the subcommand.

mod app;
mod cli;
mod commands;
mod paths;
mod render;
mod run;
mod shell;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use wcc_core::logging::{init_tracing, init_tracing_with_file, LogLevel};

use crate::app::App;
use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run_cli(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_cli(cli: Cli) -> Result<ExitCode> {
    let config_path = paths::config_path(cli.config.as_deref())?;
    let mut app = App::load(config_path)?;

    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        app.config.settings().logging.level
    };
    let _log_guard = match std::fs::create_dir_all(&app.logs_dir) {
        Ok(()) => Some(init_tracing_with_file(level, &app.logs_dir)),
        Err(e) => {
            init_tracing(level);
            tracing::warn!("Logging to stderr only: {}", e);
            None
        }
    };
    tracing::debug!("Settings: {}", app.config.path().display());

    match cli.command {
        Command::Probe(args) => run::probe(&app, args).await,
        Command::Combine(args) => run::combine(&mut app, args).await,
        Command::Shell(args) => {
            shell::run(&mut app, args.files).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
