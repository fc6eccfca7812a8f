//! Long-lived catalog store and request-scoped sessions.
//!
//! # Responsibility
//! - Own the database location for the lifetime of the process.
//! - Ensure the schema once at construction.
//! - Open one short-lived connection per unit of work.
//!
//! # Invariants
//! - A `Session` owns its connection; dropping it closes the connection on
//!   every exit path, including early returns and unwinding.
//! - `CatalogStore` keeps no open connection and no cached rows.

use super::open::open_db;
use super::DbResult;
use log::{debug, info};
use rusqlite::Connection;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Process-wide handle to the catalog database.
///
/// Constructed once at startup and shared by reference with request handlers.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    db_path: PathBuf,
}

impl CatalogStore {
    /// Opens (or creates) the database at `db_path` and ensures the schema.
    ///
    /// # Errors
    /// - Returns `DbError` when the file cannot be opened or the schema is
    ///   newer than this binary supports.
    pub fn open(db_path: impl Into<PathBuf>) -> DbResult<Self> {
        let db_path = db_path.into();
        // Bootstrap connection; dropped as soon as the schema is in place.
        let conn = open_db(&db_path)?;
        drop(conn);

        info!(
            "event=catalog_open module=db status=ok db_path={}",
            db_path.display()
        );
        Ok(Self { db_path })
    }

    /// Returns the database file backing this store.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Acquires a new session scoped to one unit of work.
    pub fn session(&self) -> DbResult<Session> {
        let conn = open_db(&self.db_path)?;
        Ok(Session {
            conn,
            opened_at: Instant::now(),
        })
    }
}

/// Connection scoped to a single request or command.
pub struct Session {
    conn: Connection,
    opened_at: Instant,
}

impl Session {
    /// Borrows the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Deref for Session {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!(
            "event=db_session_close module=db status=ok held_ms={}",
            self.opened_at.elapsed().as_millis()
        );
    }
}
