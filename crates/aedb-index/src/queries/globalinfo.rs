use aedb_types::{TableSet, Value, decode_literal};
use rusqlite::Connection;
use rusqlite::types::ValueRef;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::{quote_ident, rows::value_from_sql};
use crate::Result;

/// Highest row id of the data table.
pub const VALID_SETS: &str = "ValidSets";
/// Highest transient record index of the data table.
pub const TRAI: &str = "TRAI";

/// Text values are decoded as literals; other storage classes map directly.
fn decode(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Text(text) => decode_literal(&String::from_utf8_lossy(text)),
        other => value_from_sql(other),
    }
}

pub fn read(conn: &Connection, table: &str) -> Result<BTreeMap<String, Value>> {
    let mut stmt = conn.prepare(&format!("SELECT Key, Value FROM {}", quote_ident(table)))?;
    let entries = stmt
        .query_map([], |row| {
            let key = value_from_sql(row.get_ref(0)?).to_string();
            Ok((key, decode(row.get_ref(1)?)))
        })?
        .collect::<std::result::Result<BTreeMap<_, _>, rusqlite::Error>>()?;

    Ok(entries)
}

pub fn keys(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn.prepare(&format!("SELECT Key FROM {}", quote_ident(table)))?;
    let keys = stmt
        .query_map([], |row| Ok(value_from_sql(row.get_ref(0)?).to_string()))?
        .collect::<std::result::Result<BTreeSet<_>, rusqlite::Error>>()?;

    Ok(keys)
}

/// Recompute the derived summary keys from the data table. Only keys that
/// already exist are updated; nothing is inserted.
pub fn refresh(conn: &Connection, tables: &TableSet) -> Result<()> {
    let existing = keys(conn, tables.globalinfo())?;
    let globalinfo = quote_ident(tables.globalinfo());
    let data = quote_ident(tables.data());

    if existing.contains(VALID_SETS) {
        conn.execute(
            &format!(
                "UPDATE {} SET Value = (SELECT MAX(rowid) FROM {}) WHERE Key = ?1",
                globalinfo, data
            ),
            [VALID_SETS],
        )?;
    }

    if existing.contains(TRAI) {
        conn.execute(
            &format!(
                "UPDATE {} SET Value = (SELECT MAX(TRAI) FROM {}) WHERE Key = ?1",
                globalinfo, data
            ),
            [TRAI],
        )?;
    }

    debug!(
        table = tables.globalinfo(),
        valid_sets = existing.contains(VALID_SETS),
        trai = existing.contains(TRAI),
        "refreshed global info"
    );
    Ok(())
}
