//! Builders for sample AE files.
//!
//! The layouts are trimmed versions of what acquisition software writes:
//! same table names and key columns, fewer measurement columns.

use aedb_types::{FileKind, TableSet};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use std::path::Path;

/// Declarative description of a sample file.
///
/// # Example
/// ```no_run
/// use aedb_testing::SampleDb;
/// use aedb_types::FileKind;
///
/// SampleDb::new(FileKind::Pri)
///     .with_rows(10)
///     .with_param(1, 1, 1.5)
///     .create("/tmp/sample.pridb".as_ref())
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SampleDb {
    kind: FileKind,
    tables: TableSet,
    rows: usize,
    data_table: bool,
    fieldinfo: bool,
    global_info: Option<Vec<(String, String)>>,
    params: Vec<(i64, i64, f64)>,
}

impl SampleDb {
    /// Standard layout with the usual global-info keys and no rows.
    pub fn new(kind: FileKind) -> Self {
        Self {
            kind,
            tables: kind.tables(),
            rows: 0,
            data_table: true,
            fieldinfo: true,
            global_info: Some(vec![
                ("Version".to_string(), "1".to_string()),
                ("TimeBase".to_string(), "10000000".to_string()),
                ("ValidSets".to_string(), "0".to_string()),
                ("TRAI".to_string(), "0".to_string()),
            ]),
            params: Vec::new(),
        }
    }

    /// Use the layout of `kind` under a different table prefix.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.tables = TableSet::new(prefix);
        self
    }

    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    /// Replace the global-info entries. Values are stored as given.
    pub fn with_global_info(mut self, entries: &[(&str, &str)]) -> Self {
        self.global_info = Some(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    pub fn without_global_info(mut self) -> Self {
        self.global_info = None;
        self
    }

    pub fn without_data_table(mut self) -> Self {
        self.data_table = false;
        self
    }

    pub fn without_fieldinfo(mut self) -> Self {
        self.fieldinfo = false;
        self
    }

    pub fn with_param(mut self, id: i64, chan: i64, adc_uv: f64) -> Self {
        self.params.push((id, chan, adc_uv));
        self
    }

    pub fn tables(&self) -> &TableSet {
        &self.tables
    }

    /// Statement appending one data row; bind the record index as `?1`.
    pub fn insert_row_sql(&self) -> String {
        let data = self.tables.data();
        match self.kind {
            FileKind::Pri => format!(
                "INSERT INTO {} (SetType, Time, Chan, Status, ParamID, Amp, TRAI) \
                 VALUES (1, ?1 * 0.001, 1, 0, 1, 50.0, ?1)",
                data
            ),
            FileKind::Tra => format!(
                "INSERT INTO {} (Time, Chan, Status, ParamID, TRAI, Samples, DataSize, Data) \
                 VALUES (?1 * 0.001, 1, 0, 1, ?1, 4, 8, X'0000000000000000')",
                data
            ),
            FileKind::Trf => format!(
                "INSERT INTO {} (TRAI, FFT_CoG, FFT_FoM) VALUES (?1, 100.0, 110.0)",
                data
            ),
        }
    }

    fn data_columns(&self) -> &'static str {
        match self.kind {
            FileKind::Pri => {
                "SetID INTEGER PRIMARY KEY, SetType INTEGER, Time REAL, Chan INTEGER, \
                 Status INTEGER, ParamID INTEGER, Thr REAL, Amp REAL, RiseT REAL, Dur REAL, \
                 Eny REAL, RMS REAL, Counts INTEGER, TRAI INTEGER"
            }
            FileKind::Tra => {
                "SetID INTEGER PRIMARY KEY, Time REAL, Chan INTEGER, Status INTEGER, \
                 ParamID INTEGER, TRAI INTEGER, Samples INTEGER, DataSize INTEGER, Data BLOB"
            }
            FileKind::Trf => {
                "TRAI INTEGER PRIMARY KEY, FFT_CoG REAL, FFT_FoM REAL, PA REAL, RA REAL"
            }
        }
    }

    /// Write the file. Fails if `path` already exists.
    pub fn create(&self, path: &Path) -> Result<()> {
        if path.exists() {
            bail!("Sample file already exists: {}", path.display());
        }
        let conn = Connection::open(path)?;
        let tables = &self.tables;

        if self.data_table {
            conn.execute_batch(&format!(
                "CREATE TABLE {} ({});",
                tables.data(),
                self.data_columns()
            ))?;
            let insert = self.insert_row_sql();
            for i in 1..=self.rows {
                conn.execute(&insert, params![i as i64])?;
            }
        }

        if self.fieldinfo {
            conn.execute_batch(&format!(
                r#"
                CREATE TABLE {fi} (field TEXT, Unit TEXT, Parameter TEXT);
                INSERT INTO {fi} VALUES ('Time', '[s]', NULL);
                INSERT INTO {fi} VALUES ('Amp', '[µV]', 'ADC_µV');
                "#,
                fi = tables.fieldinfo()
            ))?;
        }

        if let Some(entries) = &self.global_info {
            conn.execute_batch(&format!(
                "CREATE TABLE {} (Key TEXT PRIMARY KEY, Value TEXT);",
                tables.globalinfo()
            ))?;
            let insert = format!(
                "INSERT INTO {} (Key, Value) VALUES (?1, ?2)",
                tables.globalinfo()
            );
            for (key, value) in entries {
                conn.execute(&insert, params![key, value])?;
            }
        }

        conn.execute_batch(&format!(
            r#"CREATE TABLE {} (ID INTEGER PRIMARY KEY, SetupID INTEGER, Chan INTEGER, "ADC_µV" REAL, ADC_TE REAL, ADC_SS INTEGER);"#,
            tables.params()
        ))?;
        let insert = format!(
            r#"INSERT INTO {} (ID, SetupID, Chan, "ADC_µV", ADC_TE, ADC_SS) VALUES (?1, 1, ?2, ?3, 1.0, 0)"#,
            tables.params()
        );
        for (id, chan, adc_uv) in &self.params {
            conn.execute(&insert, params![id, chan, adc_uv])?;
        }

        Ok(())
    }
}
