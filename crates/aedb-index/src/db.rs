use aedb_types::{FileKind, TableSet, Value};
use rusqlite::{Connection, OpenFlags, Params};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};
use tracing::{debug, warn};

use crate::queries::{globalinfo, params, rows, schema};
use crate::{Error, OpenOptions, Result, pragmas};

pub use crate::queries::rows::Record;

/// Parameter records keyed by their `ID`.
pub type ParameterTable = BTreeMap<i64, Record>;

/// Handle to one pridb/tradb/trfdb file.
///
/// Owns exactly one connection. The handle is closed by [`Database::close`]
/// or, failing that, when it is dropped; on a write handle closing first
/// refreshes the derived global-info keys and commits.
///
/// Read-only handles can be shared between threads (the connection sits
/// behind a mutex). Write handles are meant for a single owner: only one
/// writer per file is expected, and the exclusive lock taken by write
/// sessions makes a second writer fail at the engine.
///
/// Calls do not nest: a method invoked from inside a
/// [`Database::with_connection`] closure on the same thread fails with
/// [`Error::ReentrantAccess`].
pub struct Database {
    filename: PathBuf,
    readonly: bool,
    tables: TableSet,
    conn: Mutex<Option<Connection>>,
    /// Thread currently holding `conn`, if any.
    holder: Mutex<Option<ThreadId>>,
}

/// Locked connection slot. Clears the holder before the lock is released.
struct ConnGuard<'a> {
    conn: MutexGuard<'a, Option<Connection>>,
    holder: &'a Mutex<Option<ThreadId>>,
}

impl Drop for ConnGuard<'_> {
    fn drop(&mut self) {
        *recover(self.holder.lock()) = None;
    }
}

impl Database {
    pub fn open(path: impl AsRef<Path>, options: &OpenOptions) -> Result<Self> {
        let path = path.as_ref();
        options.check_extension(path)?;

        let open_failed = |source| Error::OpenFailed {
            path: path.to_path_buf(),
            source,
        };

        // Neither mode carries SQLITE_OPEN_CREATE: a missing file is an error
        let mode = if options.readonly {
            OpenFlags::SQLITE_OPEN_READ_ONLY
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE
        };
        let conn = Connection::open_with_flags(path, mode | OpenFlags::SQLITE_OPEN_NO_MUTEX)
            .map_err(open_failed)?;

        if !options.readonly {
            pragmas::configure_write_session(&conn).map_err(open_failed)?;
        }

        let tables = TableSet::new(&options.table_prefix);

        // First catalog read; a file that is not a database fails here
        let existing = schema::table_names(&conn).map_err(|err| match err {
            Error::QueryFailed(source) => open_failed(source),
            other => other,
        })?;
        if !existing.contains(tables.data()) {
            drop(conn);
            return Err(Error::SchemaError {
                table: tables.data().to_string(),
            });
        }

        debug!(
            path = %path.display(),
            prefix = tables.prefix(),
            readonly = options.readonly,
            "opened database"
        );

        Ok(Self {
            filename: path.to_path_buf(),
            readonly: options.readonly,
            tables,
            conn: Mutex::new(Some(conn)),
            holder: Mutex::new(None),
        })
    }

    /// Open one of the AE file kinds, enforcing its file extension.
    pub fn open_kind(path: impl AsRef<Path>, kind: FileKind, readonly: bool) -> Result<Self> {
        Self::open(path, &OpenOptions::for_kind(kind).readonly(readonly))
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn readonly(&self) -> bool {
        self.readonly
    }

    pub fn table_prefix(&self) -> &str {
        self.tables.prefix()
    }

    pub fn tables(&self) -> &TableSet {
        &self.tables
    }

    pub fn is_connected(&self) -> bool {
        // A nested call only happens while the connection is in use
        self.acquire().map_or(true, |guard| guard.conn.is_some())
    }

    /// Number of rows in the data table.
    pub fn row_count(&self) -> Result<usize> {
        self.with_conn(|conn| schema::row_count(conn, self.tables.data()))
    }

    /// Columns of the data table, in declaration order.
    pub fn columns(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| schema::columns(conn, self.tables.data()))
    }

    /// Names of all tables in the file.
    pub fn table_names(&self) -> Result<BTreeSet<String>> {
        self.with_conn(schema::table_names)
    }

    /// Content of the global-info table with values decoded as literals.
    ///
    /// Text that does not parse as a literal is returned as [`Value::Str`].
    pub fn global_info(&self) -> Result<BTreeMap<String, Value>> {
        self.with_conn(|conn| globalinfo::read(conn, self.tables.globalinfo()))
    }

    /// Recompute `ValidSets` (max row id) and `TRAI` (max `TRAI`) from the
    /// data table, for whichever of the two keys exist.
    ///
    /// Runs automatically when a write handle is closed.
    pub fn update_global_info(&self) -> Result<()> {
        self.require_write_access()?;
        self.with_conn(|conn| globalinfo::refresh(conn, &self.tables))
    }

    /// Rows of the field-info table in store order.
    pub fn field_info(&self) -> Result<Vec<Record>> {
        self.with_conn(|conn| rows::select_all(conn, self.tables.fieldinfo()))
    }

    /// The parameter table keyed by `ID`.
    ///
    /// Every call scans the table again, so rows written by another process
    /// are always visible. Callers that need a stable snapshot keep the
    /// returned map.
    pub fn parameter_table(&self) -> Result<ParameterTable> {
        self.with_conn(|conn| params::read_all(conn, self.tables.params()))
    }

    /// Parameters for a single `ID`.
    pub fn parameter(&self, id: i64) -> Result<Record> {
        self.parameter_table()?
            .remove(&id)
            .ok_or_else(|| Error::NotFound {
                id,
                table: self.tables.params().to_string(),
            })
    }

    /// Run `f` against the live connection.
    ///
    /// Meant for collaborators issuing their own SQL. Statements run in
    /// autocommit mode; a transaction left open by `f` is committed when a
    /// write handle closes.
    ///
    /// `f` must use the connection it is given. Calling back into this
    /// handle from `f` fails with [`Error::ReentrantAccess`].
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T> {
        self.with_conn(|conn| Ok(f(conn)?))
    }

    /// Execute a single mutating statement. Returns the number of changed rows.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        self.require_write_access()?;
        self.with_conn(|conn| Ok(conn.execute(sql, params)?))
    }

    /// Close the connection. Calling it again is a no-op.
    ///
    /// On a write handle the derived global-info keys are refreshed and any
    /// open transaction is committed first. The connection is released even
    /// if one of those steps fails; the first error is returned.
    pub fn close(&self) -> Result<()> {
        let Some(conn) = self.acquire()?.conn.take() else {
            return Ok(());
        };

        let flushed = if self.readonly {
            Ok(())
        } else {
            flush(&conn, &self.tables)
        };
        let closed = conn.close().map_err(|(_, err)| Error::QueryFailed(err));

        debug!(path = %self.filename.display(), "closed database");
        flushed.and(closed)
    }

    fn require_write_access(&self) -> Result<()> {
        if self.readonly {
            return Err(Error::ReadOnlyViolation);
        }
        Ok(())
    }

    fn acquire(&self) -> Result<ConnGuard<'_>> {
        let current = thread::current().id();
        if *recover(self.holder.lock()) == Some(current) {
            return Err(Error::ReentrantAccess);
        }

        let conn = recover(self.conn.lock());
        *recover(self.holder.lock()) = Some(current);
        Ok(ConnGuard {
            conn,
            holder: &self.holder,
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let guard = self.acquire()?;
        let conn = guard.conn.as_ref().ok_or(Error::NotConnected)?;
        f(conn)
    }
}

/// Poisoning only means another caller panicked; the slot itself is intact.
fn recover<T>(result: std::result::Result<T, PoisonError<T>>) -> T {
    result.unwrap_or_else(PoisonError::into_inner)
}

/// Summary refresh, then commit. The commit is attempted even if the refresh
/// failed so rows written by the caller are kept.
fn flush(conn: &Connection, tables: &TableSet) -> Result<()> {
    let refreshed = globalinfo::refresh(conn, tables);
    let committed = if conn.is_autocommit() {
        Ok(())
    } else {
        conn.execute_batch("COMMIT").map_err(Error::from)
    };
    refreshed.and(committed)
}

impl Drop for Database {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(
                path = %self.filename.display(),
                error = %err,
                "failed to close database cleanly"
            );
        }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("filename", &self.filename)
            .field("readonly", &self.readonly)
            .field("prefix", &self.tables.prefix())
            .field("connected", &self.is_connected())
            .finish()
    }
}
