//! SQLite connection handling.
//!
//! `DbPool` is the single-connection wrapper used by the CLI. `SharedPool` is the
//! server flavour: one writer connection behind a mutex, used from blocking tasks,
//! plus short-lived read-only connections so readers never queue behind writers.

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    /// Open (or create) the database in read-write mode.
    pub fn new(path: &str) -> AppResult<Self> {
        let conn = Connection::open(Path::new(path))?;
        configure(&conn, true)?;
        Ok(Self { conn })
    }

    /// Open an existing database read-only.
    pub fn read_only(path: &str) -> AppResult<Self> {
        let conn = Connection::open_with_flags(
            Path::new(path),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        configure(&conn, false)?;
        Ok(Self { conn })
    }

    /// Helper to execute a closure with a mutable connection reference.
    pub fn with_conn<F, T>(&mut self, func: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T>,
    {
        func(&mut self.conn)
    }
}

fn configure(conn: &Connection, writer: bool) -> AppResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    if writer {
        // journal_mode returns the resulting mode as a row
        let _mode: String = conn.query_row("PRAGMA journal_mode = WAL;", [], |r| r.get(0))?;
    }
    Ok(())
}

/// Connection handle shared by the HTTP handlers.
#[derive(Clone)]
pub struct SharedPool {
    path: Arc<String>,
    writer: Arc<Mutex<DbPool>>,
}

impl SharedPool {
    /// Open the writer connection. The schema must already be migrated.
    pub fn open(path: &str) -> AppResult<Self> {
        let writer = DbPool::new(path)?;
        Ok(Self {
            path: Arc::new(path.to_string()),
            writer: Arc::new(Mutex::new(writer)),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run `f` on the writer connection inside a blocking task.
    pub async fn write<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let writer = Arc::clone(&self.writer);
        tokio::task::spawn_blocking(move || {
            let mut guard = writer
                .lock()
                .map_err(|_| AppError::Other("writer connection lock poisoned".into()))?;
            f(&mut guard.conn)
        })
        .await
        .map_err(|e| AppError::Other(format!("blocking task failed: {e}")))?
    }

    /// Run `f` on a fresh read-only connection inside a blocking task.
    pub async fn read<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = Arc::clone(&self.path);
        tokio::task::spawn_blocking(move || {
            let pool = DbPool::read_only(&path)?;
            f(&pool.conn)
        })
        .await
        .map_err(|e| AppError::Other(format!("blocking task failed: {e}")))?
    }
}
