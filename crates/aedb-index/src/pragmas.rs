//! Session settings for write handles.
//!
//! Acquisition writes bursts of append-only rows from a single writer:
//! WAL journaling, an exclusive lock held for the whole session (a second
//! writer fails at the engine instead of interleaving), no fsync.

use rusqlite::Connection;
use tracing::debug;

pub fn configure_write_session(conn: &Connection) -> rusqlite::Result<()> {
    let journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    let locking_mode: String =
        conn.query_row("PRAGMA locking_mode = EXCLUSIVE", [], |row| row.get(0))?;
    conn.execute_batch("PRAGMA synchronous = OFF")?;

    debug!(%journal_mode, %locking_mode, "applied write-session pragmas");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_configure_write_session() {
        let dir = TempDir::new().unwrap();
        let conn = Connection::open(dir.path().join("session.pridb")).unwrap();
        configure_write_session(&conn).unwrap();

        let journal_mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(journal_mode, "wal");

        let locking_mode: String = conn
            .query_row("PRAGMA locking_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(locking_mode, "exclusive");

        let synchronous: i64 = conn
            .query_row("PRAGMA synchronous", [], |row| row.get(0))
            .unwrap();
        assert_eq!(synchronous, 0);
    }
}
