// SQLite access layer for AE measurement files
// One Database handle per file; the three file kinds differ only in table prefix

mod db;
mod error;
mod options;
mod pragmas;
mod queries;

// Public API
pub use db::{Database, ParameterTable, Record};
pub use error::{Error, Result};
pub use options::OpenOptions;

pub use aedb_types::{FileKind, TableSet, Value};
pub use rusqlite;
