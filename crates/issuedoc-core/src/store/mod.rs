//! Document store seam.
//!
//! A store is a key-less collection of opaque document blobs: callers append
//! one document at a time and read every document back in one pass. Order is
//! not part of the contract, and nothing ties a read to an earlier write.

pub mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::ErrorCode;

/// Errors raised by a [`DocumentStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying database failed.
    #[error("store database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Creating the store's directory failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A single stored row could not be read back as bytes.
    #[error("stored document {row} is unreadable: {reason}")]
    UnreadableRow { row: usize, reason: String },

    /// Table name is not a plain SQL identifier.
    #[error("invalid table name '{0}'")]
    InvalidTableName(String),
}

impl StoreError {
    /// Machine-readable code associated with this store error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Sqlite(_) | Self::Io(_) => ErrorCode::StoreUnavailable,
            Self::UnreadableRow { .. } => ErrorCode::StoreRowUnreadable,
            Self::InvalidTableName(_) => ErrorCode::InvalidTableName,
        }
    }
}

/// Result of a full scan: one entry per stored row.
///
/// An inner `Err` means that row alone could not be read; the rest of the
/// scan is still usable.
pub type DocumentRows = Vec<Result<Vec<u8>, StoreError>>;

/// Append-only collection of opaque documents.
pub trait DocumentStore {
    /// Append a single document.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    fn write_one(&mut self, doc: &[u8]) -> Result<(), StoreError>;

    /// Read every stored document once.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the scan cannot start. Failures on
    /// individual rows are reported inside [`DocumentRows`].
    fn read_all(&self) -> Result<DocumentRows, StoreError>;
}

/// In-process store backed by a `Vec`. Reads return insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    docs: Vec<Vec<u8>>,
}

impl MemoryStore {
    #[must_use]
    pub const fn new() -> Self {
        Self { docs: Vec::new() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Stored documents, oldest first.
    #[must_use]
    pub fn documents(&self) -> &[Vec<u8>] {
        &self.docs
    }
}

impl DocumentStore for MemoryStore {
    fn write_one(&mut self, doc: &[u8]) -> Result<(), StoreError> {
        self.docs.push(doc.to_vec());
        Ok(())
    }

    fn read_all(&self) -> Result<DocumentRows, StoreError> {
        Ok(self.docs.iter().cloned().map(Ok).collect())
    }
}
