//! Access to the sync tool's SQLite database.
//!
//! The database belongs to the sync CLI. SeedFront never creates or migrates
//! it: every operation opens a short-lived connection to an existing file,
//! registers the formatting SQL functions, runs, and closes the connection
//! when it goes out of scope.

pub mod models;
pub mod queries;

use std::path::{Path, PathBuf};

use rusqlite::functions::FunctionFlags;
use rusqlite::OpenFlags;

pub use models::{Download, DownloadTotals, Lock, Timestamp, Upload};
pub use rusqlite::Connection;
pub use queries::{DownloadFilter, UploadFilter};

use crate::units;

/// Errors raised while talking to the sync database.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The configured database file does not exist
    #[error("Database {} not found", path.display())]
    Missing {
        /// Path that was looked up
        path: PathBuf,
    },

    /// SQLite rejected a statement or the connection
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The blocking worker running the query died
    #[error("Database task failed: {reason}")]
    Task {
        /// Join error description
        reason: String,
    },
}

/// Handle to the sync database file.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Creates a handle without touching the file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the database file exists right now.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Opens a connection to the existing file.
    ///
    /// # Errors
    ///
    /// - `DbError::Missing` - If the file does not exist
    /// - `DbError::Sqlite` - If SQLite cannot open it or register functions
    pub fn connect(&self) -> Result<Connection, DbError> {
        if !self.exists() {
            return Err(DbError::Missing {
                path: self.path.clone(),
            });
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.path, flags)?;
        register_functions(&conn)?;
        tracing::debug!("Opened database {}", self.path.display());
        Ok(conn)
    }

    /// Runs `operation` against a fresh connection on the blocking pool.
    ///
    /// # Errors
    ///
    /// - `DbError::Missing` - If the database file does not exist
    /// - `DbError::Sqlite` - If the operation fails
    /// - `DbError::Task` - If the blocking task panicked or was cancelled
    pub async fn run<T, F>(&self, operation: F) -> Result<T, DbError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, DbError> + Send + 'static,
    {
        let database = self.clone();
        tokio::task::spawn_blocking(move || {
            let conn = database.connect()?;
            operation(&conn)
        })
        .await
        .map_err(|e| DbError::Task {
            reason: e.to_string(),
        })?
    }
}

/// Registers `sizeof(x)` and `byte_to_gi(x)` on a connection.
///
/// Both return NULL for NULL input.
///
/// # Errors
///
/// - `rusqlite::Error` - If SQLite refuses the function definition
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    conn.create_scalar_function("sizeof", 1, flags, |ctx| {
        let value: Option<f64> = ctx.get(0)?;
        Ok(value.map(units::sizeof))
    })?;

    conn.create_scalar_function("byte_to_gi", 1, flags, |ctx| {
        let value: Option<f64> = ctx.get(0)?;
        Ok(value.map(units::byte_to_gi))
    })?;

    Ok(())
}
