//! View models printed by the handlers, as plain text or JSON.

use crate::types::OutputFormat;
use aedb_index::{FileKind, ParameterTable, Record, Value};
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::PathBuf;

/// Plain-text rendering of a view model.
pub trait PlainView {
    fn render_plain(&self) -> String;
}

pub fn render<T>(format: OutputFormat, view: &T) -> Result<()>
where
    T: Serialize + PlainView,
{
    match format {
        OutputFormat::Plain => print!("{}", view.render_plain()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(view)?),
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct FileInfoView {
    pub file: PathBuf,
    /// Kind implied by the extension; `None` for other extensions.
    pub kind: Option<FileKind>,
    pub prefix: String,
    pub readonly: bool,
    pub rows: usize,
    pub columns: Vec<String>,
    pub tables: Vec<String>,
}

impl PlainView for FileInfoView {
    fn render_plain(&self) -> String {
        let mode = if self.readonly { "read-only" } else { "read-write" };
        let mut out = String::new();
        let _ = writeln!(out, "file:     {}", self.file.display());
        if let Some(kind) = self.kind {
            let _ = writeln!(out, "kind:     {}", kind);
        }
        let _ = writeln!(out, "prefix:   {}", self.prefix);
        let _ = writeln!(out, "mode:     {}", mode);
        let _ = writeln!(out, "rows:     {}", self.rows);
        let _ = writeln!(out, "columns:  {}", self.columns.join(", "));
        let _ = writeln!(out, "tables:   {}", self.tables.join(", "));
        out
    }
}

/// Decoded global-info entries.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct GlobalInfoView {
    pub entries: BTreeMap<String, Value>,
}

impl PlainView for GlobalInfoView {
    fn render_plain(&self) -> String {
        render_entries(&self.entries, "")
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ParameterTableView {
    pub table: ParameterTable,
}

impl PlainView for ParameterTableView {
    fn render_plain(&self) -> String {
        if self.table.is_empty() {
            return "(no parameters)\n".to_string();
        }

        let mut out = String::new();
        for (id, record) in &self.table {
            let _ = writeln!(out, "[ID {}]", id);
            out.push_str(&render_entries(record, "  "));
        }
        out
    }
}

#[derive(Debug, Serialize)]
pub struct ParameterView {
    pub id: i64,
    pub parameters: Record,
}

impl PlainView for ParameterView {
    fn render_plain(&self) -> String {
        render_entries(&self.parameters, "")
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct FieldInfoView {
    pub rows: Vec<Record>,
}

impl PlainView for FieldInfoView {
    fn render_plain(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            let line = row
                .iter()
                .map(|(column, value)| format!("{}={}", column, value))
                .collect::<Vec<_>>()
                .join("\t");
            let _ = writeln!(out, "{}", line);
        }
        out
    }
}

/// Summary keys after a refresh. Keys absent from the file stay `None`.
#[derive(Debug, Serialize)]
pub struct RefreshView {
    pub file: PathBuf,
    #[serde(rename = "ValidSets")]
    pub valid_sets: Option<Value>,
    #[serde(rename = "TRAI")]
    pub trai: Option<Value>,
}

impl PlainView for RefreshView {
    fn render_plain(&self) -> String {
        let mut out = format!("Refreshed {}\n", self.file.display());
        for (key, value) in [("ValidSets", &self.valid_sets), ("TRAI", &self.trai)] {
            if let Some(value) = value {
                let _ = writeln!(out, "  {} = {}", key, value);
            }
        }
        out
    }
}

fn render_entries(entries: &BTreeMap<String, Value>, indent: &str) -> String {
    let mut out = String::new();
    for (key, value) in entries {
        let _ = writeln!(out, "{}{} = {}", indent, key, value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_info_plain_is_sorted_key_value_lines() {
        let mut entries = BTreeMap::new();
        entries.insert("Version".to_string(), Value::Int(3));
        entries.insert("Comment".to_string(), Value::Str("raw text".to_string()));

        let view = GlobalInfoView { entries };
        assert_eq!(view.render_plain(), "Comment = raw text\nVersion = 3\n");
    }

    #[test]
    fn test_parameter_table_plain() {
        let mut record = Record::new();
        record.insert("Chan".to_string(), Value::Int(2));

        let mut table = ParameterTable::new();
        table.insert(7, record);

        let view = ParameterTableView { table };
        assert_eq!(view.render_plain(), "[ID 7]\n  Chan = 2\n");

        let empty = ParameterTableView {
            table: ParameterTable::new(),
        };
        assert_eq!(empty.render_plain(), "(no parameters)\n");
    }

    #[test]
    fn test_refresh_view_skips_absent_keys() {
        let view = RefreshView {
            file: PathBuf::from("run.pridb"),
            valid_sets: Some(Value::Int(4)),
            trai: None,
        };
        assert_eq!(view.render_plain(), "Refreshed run.pridb\n  ValidSets = 4\n");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["ValidSets"], 4);
        assert!(json["TRAI"].is_null());
    }
}
