//! SQLite-backed document store.
//!
//! One table, one `properties` column holding each document as a blob.
//! Connections use the same runtime pragmas everywhere:
//! - `journal_mode = WAL` so a reader can scan while a writer appends
//! - `busy_timeout = 5s` to ride out transient lock contention

use std::path::Path;
use std::time::Duration;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, Row, params};
use tracing::{debug, info, warn};

use super::{DocumentRows, DocumentStore, StoreError};

/// Busy timeout used for store connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default table name.
pub const DEFAULT_TABLE: &str = "issue";

/// Document store persisted in a single SQLite table.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    table: String,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure `table` exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the table name is invalid, the parent directory
    /// cannot be created, or opening/configuring the database fails.
    pub fn open(path: &Path, table: &str) -> Result<Self, StoreError> {
        validate_table_name(table)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        configure_connection(&conn)?;
        let store = Self {
            conn,
            table: table.to_string(),
        };
        store.ensure_table()?;
        debug!(path = %path.display(), table, "opened sqlite document store");
        Ok(store)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the table name is invalid or SQLite fails.
    pub fn open_in_memory(table: &str) -> Result<Self, StoreError> {
        validate_table_name(table)?;
        let conn = Connection::open_in_memory()?;
        conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
        let store = Self {
            conn,
            table: table.to_string(),
        };
        store.ensure_table()?;
        Ok(store)
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the DDL fails.
    pub fn ensure_table(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (properties BLOB NOT NULL);",
            self.table
        ))?;
        Ok(())
    }

    /// Drop and recreate the table, discarding every stored document.
    ///
    /// # Errors
    ///
    /// Returns an error if the DDL fails.
    pub fn reset(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(&format!("DROP TABLE IF EXISTS {};", self.table))?;
        self.ensure_table()?;
        info!(table = %self.table, "reset document table");
        Ok(())
    }

    /// Number of stored documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the count query fails.
    pub fn count(&self) -> Result<usize, StoreError> {
        let n: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", self.table),
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(n).unwrap_or_default())
    }

    /// Borrow the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl DocumentStore for SqliteStore {
    fn write_one(&mut self, doc: &[u8]) -> Result<(), StoreError> {
        self.conn.execute(
            &format!("INSERT INTO {} (properties) VALUES (?1)", self.table),
            params![doc],
        )?;
        Ok(())
    }

    fn read_all(&self) -> Result<DocumentRows, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT properties FROM {} ORDER BY rowid", self.table))?;
        let cells = stmt.query_map([], |row| Ok(row_bytes(row)))?;
        Ok(collect_rows(cells))
    }
}

/// Bytes of the `properties` cell, or why they could not be read.
fn row_bytes(row: &Row<'_>) -> Result<Vec<u8>, String> {
    match row.get_ref(0) {
        Ok(ValueRef::Blob(bytes) | ValueRef::Text(bytes)) => Ok(bytes.to_vec()),
        Ok(other) => Err(format!("unexpected {} value", other.data_type())),
        Err(err) => Err(err.to_string()),
    }
}

/// A failed step ends the scan. Rows read before it are kept and the
/// failure becomes the last entry.
fn collect_rows<I>(cells: I) -> DocumentRows
where
    I: IntoIterator<Item = rusqlite::Result<Result<Vec<u8>, String>>>,
{
    let mut docs = DocumentRows::new();
    for (row, cell) in cells.into_iter().enumerate() {
        match cell {
            Ok(cell) => {
                docs.push(cell.map_err(|reason| StoreError::UnreadableRow { row, reason }));
            }
            Err(err) => {
                warn!(row, %err, "document scan stopped early");
                docs.push(Err(StoreError::Sqlite(err)));
                break;
            }
        }
    }
    docs
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(())
}

/// Accept `[A-Za-z_][A-Za-z0-9_]*`; the name is spliced into SQL text.
fn validate_table_name(table: &str) -> Result<(), StoreError> {
    let mut chars = table.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidTableName(table.to_string()))
    }
}
