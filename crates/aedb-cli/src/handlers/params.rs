use crate::output::{self, ParameterTableView, ParameterView};
use crate::types::OutputFormat;
use aedb_index::{Database, OpenOptions};
use anyhow::Result;
use std::path::Path;

pub fn handle(
    file: &Path,
    options: &OpenOptions,
    id: Option<i64>,
    format: OutputFormat,
) -> Result<()> {
    let db = Database::open(file, options)?;

    match id {
        Some(id) => {
            let parameters = db.parameter(id)?;
            db.close()?;
            output::render(format, &ParameterView { id, parameters })
        }
        None => {
            let table = db.parameter_table()?;
            db.close()?;
            output::render(format, &ParameterTableView { table })
        }
    }
}
