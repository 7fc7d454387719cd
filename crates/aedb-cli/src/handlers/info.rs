use crate::output::{self, FileInfoView};
use crate::types::OutputFormat;
use aedb_index::{Database, FileKind, OpenOptions};
use anyhow::Result;
use std::path::Path;

pub fn handle(file: &Path, options: &OpenOptions, format: OutputFormat) -> Result<()> {
    let db = Database::open(file, options)?;

    let view = FileInfoView {
        file: db.filename().to_path_buf(),
        kind: FileKind::from_path(db.filename()),
        prefix: db.table_prefix().to_string(),
        readonly: db.readonly(),
        rows: db.row_count()?,
        columns: db.columns()?,
        tables: db.table_names()?.into_iter().collect(),
    };
    db.close()?;

    output::render(format, &view)
}
