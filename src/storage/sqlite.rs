//! SQLite database layer.
//!
//! Wraps a single `rusqlite::Connection` and exposes the primitives the
//! search engine consumes: parameterized execution, temp-table lifecycle,
//! transactions, and sqlite-vec extension loading. Values are always bound,
//! never interpolated; the only interpolated strings are identifiers, which
//! must pass [`validate_identifier`] first.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use rusqlite::Connection;

use crate::error::{PqError, Result};

/// Reject any identifier outside the `[A-Za-z0-9_]+` allow-list before it is
/// interpolated into SQL text.
pub fn validate_identifier(name: &str) -> Result<()> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());
    if re.is_match(name) {
        Ok(())
    } else {
        Err(PqError::InvalidInput(format!("invalid identifier: {name:?}")))
    }
}

/// SQLite database wrapper for a pose database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::configure_pragmas(&conn)?;
        Ok(Self { conn })
    }

    /// In-memory database, mainly for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure_pragmas(&conn)?;
        Ok(Self { conn })
    }

    fn configure_pragmas(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = ON;",
        )?;
        Ok(())
    }

    /// Get a reference to the connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Execute a parameterized statement, wrapping failures with the
    /// statement text.
    pub fn execute(&self, sql: &str, params: impl rusqlite::Params) -> Result<usize> {
        self.conn
            .execute(sql, params)
            .map_err(|e| exec_error(sql, e))
    }

    /// Create a temporary table with the given column layout.
    pub fn create_temp_table(&self, name: &str, layout: &str, if_not_exists: bool) -> Result<()> {
        validate_identifier(name)?;
        let clause = if if_not_exists { "IF NOT EXISTS " } else { "" };
        let sql = format!("CREATE TEMPORARY TABLE {clause}{name} ({layout})");
        self.execute(&sql, [])?;
        Ok(())
    }

    /// Drop a table, optionally ignoring a missing one.
    pub fn drop_table(&self, name: &str, ignore_missing: bool) -> Result<()> {
        validate_identifier(name)?;
        let clause = if ignore_missing { "IF EXISTS " } else { "" };
        let sql = format!("DROP TABLE {clause}{name}");
        self.execute(&sql, [])?;
        Ok(())
    }

    /// Rename a table.
    pub fn rename_table(&self, old: &str, new: &str) -> Result<()> {
        validate_identifier(old)?;
        validate_identifier(new)?;
        let sql = format!("ALTER TABLE {old} RENAME TO {new}");
        self.execute(&sql, [])?;
        Ok(())
    }

    /// Whether a table with the given name exists in the main or temp schema.
    pub fn has_table(&self, name: &str) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT (SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1)
                      + (SELECT COUNT(*) FROM sqlite_temp_master WHERE type = 'table' AND name = ?1)",
                [name],
                |row| row.get(0),
            )?;
        Ok(count > 0)
    }

    /// Attach another database file under the given schema name.
    pub fn attach(&self, path: &Path, schema: &str) -> Result<()> {
        validate_identifier(schema)?;
        let sql = format!("ATTACH DATABASE ?1 AS {schema}");
        self.execute(&sql, [path.to_string_lossy().as_ref()])?;
        Ok(())
    }

    pub fn begin_transaction(&self) -> Result<()> {
        self.execute("BEGIN TRANSACTION", [])?;
        Ok(())
    }

    pub fn commit_transaction(&self) -> Result<()> {
        self.execute("COMMIT TRANSACTION", [])?;
        Ok(())
    }

    pub fn rollback_transaction(&self) -> Result<()> {
        self.execute("ROLLBACK TRANSACTION", [])?;
        Ok(())
    }

    /// Load the sqlite-vec extension and probe `vec_version()`.
    ///
    /// Failure is fatal at startup: the vector criteria cannot run without
    /// the extension, so this never degrades to a per-query error.
    #[allow(unsafe_code)]
    pub fn load_vector_extension(&self, path: &Path) -> Result<String> {
        // SAFETY: the extension path comes from trusted configuration, and
        // the guard re-disables extension loading immediately afterwards.
        unsafe {
            let _guard = rusqlite::LoadExtensionGuard::new(&self.conn).map_err(|e| {
                PqError::FeatureNotSupported(format!("cannot enable extension loading: {e}"))
            })?;
            self.conn
                .load_extension(path, Some("sqlite3_vec_init"))
                .map_err(|e| {
                    PqError::FeatureNotSupported(format!(
                        "sqlite-vec extension at {}: {e}",
                        path.display()
                    ))
                })?;
        }

        let version: String = self
            .conn
            .query_row("SELECT vec_version()", [], |row| row.get(0))
            .map_err(|e| {
                PqError::FeatureNotSupported(format!("vec_version() probe failed: {e}"))
            })?;
        tracing::info!(version = %version, "loaded sqlite-vec");
        Ok(version)
    }
}

/// Wrap an engine failure together with the failing statement text.
pub(crate) fn exec_error(sql: &str, source: rusqlite::Error) -> PqError {
    PqError::Execution {
        sql: sql.to_string(),
        source,
    }
}
