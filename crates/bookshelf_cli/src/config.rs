//! Command-line and environment configuration.
//!
//! # Responsibility
//! - Parse flags (with environment fallbacks) into a resolved `Config`.
//!
//! # Invariants
//! - `Config::log_dir` is always absolute.

use bookshelf_core::{default_backup_path, default_log_level};
use clap::Parser;
use std::path::{Path, PathBuf};

const DEFAULT_CATALOG_FILE: &str = "catalog.json";
const DEFAULT_LOG_DIR: &str = "logs";

/// Raw command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about = "Library inventory manager")]
pub struct Cli {
    /// Catalog JSON document.
    #[arg(long, env = "BOOKSHELF_CATALOG", default_value = DEFAULT_CATALOG_FILE)]
    pub catalog: PathBuf,

    /// Where a corrupted catalog is copied before it is reset.
    #[arg(long, env = "BOOKSHELF_BACKUP")]
    pub backup: Option<PathBuf>,

    /// Directory for rotating log files.
    #[arg(long, env = "BOOKSHELF_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "BOOKSHELF_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub backup_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Fills defaults and anchors the log directory at `cwd`.
    pub fn resolve(cli: Cli, cwd: &Path) -> Self {
        let backup_path = cli
            .backup
            .unwrap_or_else(|| default_backup_path(&cli.catalog));
        let log_dir = cli
            .log_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));
        let log_dir = if log_dir.is_absolute() {
            log_dir
        } else {
            cwd.join(log_dir)
        };

        Self {
            catalog_path: cli.catalog,
            backup_path,
            log_dir,
            log_level: cli
                .log_level
                .unwrap_or_else(|| default_log_level().to_string()),
        }
    }
}
