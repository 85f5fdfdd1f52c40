mod actions;
mod cli;
mod error;
mod shell;

use anyhow::{anyhow, Context};
use clap::Parser;
use cli::{Cli, Config, Screen, Session};
use colored::*;
use shell::PowerShell;
use std::io;
use std::process::ExitCode;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "ad-toolbox.log";

fn main() -> ExitCode {
    // Load environment variables before clap reads its env fallbacks
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _guard = match init_tracing(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            return ExitCode::FAILURE;
        },
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(error = %e, "Toolbox stopped");
            eprintln!("{} {:#}", "Error:".red(), e);
            ExitCode::FAILURE
        },
    }
}

/// Installs the global subscriber. Logs go to stderr unless a log directory is set.
fn init_tracing(cli: &Cli) -> anyhow::Result<Option<WorkerGuard>> {
    let (writer, guard) = match &cli.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        },
        None => (BoxMakeWriter::new(io::stderr), None),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(cli.log_dir.is_none())
        .with_writer(writer);
    let installed = if cli.log_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow!(e).context("failed to initialize logging"))?;

    Ok(guard)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_cli(&cli).context("failed to resolve configuration")?;
    info!(
        module = %config.module_path.display(),
        interpreter = %config.interpreter,
        "Starting toolbox"
    );

    let shell = PowerShell::new(config.interpreter.clone(), config.module_path.clone());
    let warning = match shell.load_module() {
        Ok(()) => {
            info!(module = %shell.module_path().display(), "Capability module loaded");
            None
        },
        Err(e) if config.require_module => {
            return Err(e).context("capability module is required");
        },
        Err(e) => {
            warn!(error = %e, "Capability module unavailable, continuing");
            Some(e.to_string())
        },
    };

    let screen = if config.clear_screen {
        Screen::terminal()
    } else {
        Screen::disabled()
    };
    let mut session = Session::new(io::stdin().lock(), io::stdout().lock(), shell)
        .with_screen(screen)
        .with_spinner(config.spinner);
    if let Some(warning) = warning {
        session = session.with_warning(warning);
    }

    session.run()?;
    info!("Session ended by user");
    Ok(())
}
