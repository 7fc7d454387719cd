use aedb_types::Value;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Statement};
use std::collections::BTreeMap;

use super::quote_ident;
use crate::Result;

/// One table row: column name to value.
pub type Record = BTreeMap<String, Value>;

/// Map an SQL storage class onto a [`Value`] without interpretation.
pub fn value_from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::None,
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(x) => Value::Float(x),
        ValueRef::Text(text) => Value::Str(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(bytes) => Value::Bytes(bytes.to_vec()),
    }
}

pub fn column_names(stmt: &Statement<'_>) -> Vec<String> {
    stmt.column_names().into_iter().map(String::from).collect()
}

/// Every row of `table` in store order.
pub fn select_all(conn: &Connection, table: &str) -> Result<Vec<Record>> {
    let mut stmt = conn.prepare(&format!("SELECT * FROM {}", quote_ident(table)))?;
    let names = column_names(&stmt);

    let records = stmt
        .query_map([], |row| {
            names
                .iter()
                .enumerate()
                .map(|(i, name)| Ok((name.clone(), value_from_sql(row.get_ref(i)?))))
                .collect::<rusqlite::Result<Record>>()
        })?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all_maps_storage_classes() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE t (i INTEGER, r REAL, s TEXT, b BLOB, n TEXT);
            INSERT INTO t VALUES (1, 2.5, 'x', X'0102', NULL);
            "#,
        )
        .unwrap();

        let records = select_all(&conn, "t").unwrap();
        assert_eq!(records.len(), 1);

        let row = &records[0];
        assert_eq!(row["i"], Value::Int(1));
        assert_eq!(row["r"], Value::Float(2.5));
        assert_eq!(row["s"], Value::from("x"));
        assert_eq!(row["b"], Value::Bytes(vec![1, 2]));
        assert_eq!(row["n"], Value::None);
    }
}
