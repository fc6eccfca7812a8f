//! CLI argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

/// Book catalog HTTP service
#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind to
    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// SQLite database file; falls back to BOOKSHELF_DB_PATH, then ./book_collection.db
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, default_value_t = bookshelf_core::default_log_level().to_string())]
    pub log_level: String,

    /// Directory for rotating log files; stderr only when absent
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Allowed CORS origin (repeatable)
    #[arg(long = "cors-origin")]
    pub cors_origins: Vec<String>,
}
