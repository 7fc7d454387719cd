use crate::output::{self, FieldInfoView};
use crate::types::OutputFormat;
use aedb_index::{Database, OpenOptions};
use anyhow::Result;
use std::path::Path;

pub fn handle(file: &Path, options: &OpenOptions, format: OutputFormat) -> Result<()> {
    let db = Database::open(file, options)?;
    let rows = db.field_info()?;
    db.close()?;

    output::render(format, &FieldInfoView { rows })
}
