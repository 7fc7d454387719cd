use std::path::PathBuf;
use thiserror::Error;

/// Result type for aedb-index operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the index layer
#[derive(Debug, Error)]
pub enum Error {
    /// File extension does not match the required one (checked before opening)
    #[error("File extension '{found}' must match '{required}'")]
    InvalidFormat { found: String, required: String },

    /// Store could not be opened (missing file, permissions, not a database)
    #[error("Failed to open database {}", path.display())]
    OpenFailed {
        path: PathBuf,
        source: rusqlite::Error,
    },

    /// Mandatory main data table is missing
    #[error("Main table '{table}' does not exist in database")]
    SchemaError { table: String },

    /// Mutating operation on a read-only handle
    #[error("Can not write to database in read-only mode. Open database with readonly = false")]
    ReadOnlyViolation,

    /// Operation on a closed handle
    #[error("Not connected to SQLite database")]
    NotConnected,

    /// Handle method called from inside its own `with_connection` closure
    #[error("Database handle is already in use by this thread")]
    ReentrantAccess,

    /// Engine error while executing a statement
    #[error("{}", describe_query_failure(.0))]
    QueryFailed(#[from] rusqlite::Error),

    /// Parameter lookup by id had no matching row
    #[error("Parameter ID {id} not found in {table}")]
    NotFound { id: i64, table: String },
}

fn describe_query_failure(err: &rusqlite::Error) -> String {
    let msg = err.to_string();
    // Optional tables are read without a presence check
    if msg.contains("no such column") || msg.contains("no such table") {
        format!(
            "Database schema mismatch: {}. The file does not have the expected table layout.",
            msg
        )
    } else {
        format!("Query failed: {}", msg)
    }
}
