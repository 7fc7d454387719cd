use rusqlite::Connection;
use std::collections::BTreeMap;

use super::{quote_ident, rows};
use crate::db::{ParameterTable, Record};
use crate::Result;

const ID_COLUMN: &str = "ID";

/// Full scan of the parameter table keyed by `ID`. The `ID` column itself is
/// not part of the records.
pub fn read_all(conn: &Connection, table: &str) -> Result<ParameterTable> {
    let mut stmt = conn.prepare(&format!("SELECT * FROM {}", quote_ident(table)))?;
    let names = rows::column_names(&stmt);
    let id_index = names
        .iter()
        .position(|name| name == ID_COLUMN)
        .ok_or_else(|| rusqlite::Error::InvalidColumnName(ID_COLUMN.to_string()))?;

    let entries = stmt
        .query_map([], |row| {
            let id: i64 = row.get(id_index)?;
            let mut record = Record::new();
            for (i, name) in names.iter().enumerate() {
                if i != id_index {
                    record.insert(name.clone(), rows::value_from_sql(row.get_ref(i)?));
                }
            }
            Ok((id, record))
        })?
        .collect::<std::result::Result<BTreeMap<_, _>, rusqlite::Error>>()?;

    Ok(entries)
}
