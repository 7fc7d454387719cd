use rusqlite::Connection;
use std::collections::BTreeSet;

use super::{quote_ident, rows};
use crate::Result;

pub fn table_names(conn: &Connection) -> Result<BTreeSet<String>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<BTreeSet<String>, rusqlite::Error>>()?;

    Ok(names)
}

pub fn row_count(conn: &Connection, table: &str) -> Result<usize> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", quote_ident(table)),
        [],
        |row| row.get(0),
    )?;

    Ok(count as usize)
}

/// Column names in declaration order. Prepares a zero-row projection, so no
/// data is read.
pub fn columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let stmt = conn.prepare(&format!("SELECT * FROM {} LIMIT 0", quote_ident(table)))?;
    Ok(rows::column_names(&stmt))
}
