//! Book catalog server entry point.
//!
//! # Responsibility
//! - Parse flags, start logging, open the catalog and serve HTTP.
//! - Print startup failures to stderr and exit non-zero.

mod args;

use std::future::Future;
use std::path::{Path, PathBuf};

use args::Cli;
use bookshelf_api::{resolve_db_path, CatalogServer, ServerConfig};
use bookshelf_core::CatalogStore;
use clap::Parser;
use log::{error, info};

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("bookshelf: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let log_dir = cli.log_dir.as_deref().map(absolute_dir).transpose()?;
    bookshelf_core::init_logging(&cli.log_level, log_dir.as_deref())?;

    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
        db_path: resolve_db_path(cli.db),
        cors_origins: cli.cors_origins,
    };

    let store = CatalogStore::open(config.db_path.clone())
        .map_err(|err| format!("failed to open catalog {}: {err}", config.db_path.display()))?;
    let server = CatalogServer::new(config, store);

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|err| format!("failed to create tokio runtime: {err}"))?;
    runtime
        .block_on(server.serve(shutdown_signal()))
        .map_err(|err| format!("http server failed: {err}"))?;

    info!("event=app_exit module=cli status=ok");
    Ok(())
}

/// File logging needs an absolute directory.
fn absolute_dir(dir: &Path) -> Result<String, String> {
    let path: PathBuf = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|err| format!("failed to resolve log dir: {err}"))?
            .join(dir)
    };
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| format!("log dir is not valid UTF-8: {}", path.display()))
}

async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await;
}

/// Resolves once `signal` fires; a failed listener never triggers shutdown.
async fn wait_for_signal(signal: impl Future<Output = std::io::Result<()>>) {
    match signal.await {
        Ok(()) => info!("event=shutdown_signal module=cli status=ok"),
        Err(err) => {
            error!("event=shutdown_signal module=cli status=error error={err}");
            std::future::pending::<()>().await;
        }
    }
}
