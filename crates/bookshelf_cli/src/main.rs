//! Bookshelf interactive entry point.
//!
//! # Responsibility
//! - Resolve configuration and start file logging.
//! - Wire stdin/stdout to a `Session` over a log-reporting catalog.

mod config;
mod session;

use bookshelf_core::{core_version, init_logging, Catalog, LogEventSink};
use clap::Parser;
use config::{Cli, Config};
use log::{error, info};
use session::Session;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cwd = std::env::current_dir().unwrap_or_else(|_| std::env::temp_dir());
    let config = Config::resolve(Cli::parse(), &cwd);

    match config.log_dir.to_str() {
        Some(log_dir) => {
            if let Err(err) = init_logging(&config.log_level, log_dir) {
                eprintln!("warning: file logging disabled: {err}");
            }
        }
        None => eprintln!("warning: file logging disabled: log directory is not valid UTF-8"),
    }
    info!(
        "event=session_start module=cli status=ok version={} catalog={}",
        core_version(),
        config.catalog_path.display()
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(
        stdin.lock(),
        stdout.lock(),
        Catalog::new(LogEventSink),
        config,
    );

    let result = session.start().and_then(|()| session.run());
    match result {
        Ok(()) => {
            info!(
                "event=session_end module=cli status=ok books={}",
                session.catalog().len()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=session_end module=cli status=error error={err}");
            eprintln!("terminal I/O failed: {err}");
            ExitCode::FAILURE
        }
    }
}
