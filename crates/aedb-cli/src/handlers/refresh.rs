use crate::output::{self, RefreshView};
use crate::types::OutputFormat;
use aedb_index::{Database, OpenOptions};
use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Open for writing and close again; closing a write handle recomputes the
/// summary keys. The result is read back through a read-only handle.
pub fn handle(file: &Path, options: &OpenOptions, format: OutputFormat) -> Result<()> {
    let writer = Database::open(file, &options.clone().readonly(false))?;
    writer.close()?;
    info!(path = %file.display(), "refreshed global info");

    let reader = Database::open(file, &options.clone().readonly(true))?;
    let mut entries = reader.global_info()?;
    reader.close()?;

    let view = RefreshView {
        file: file.to_path_buf(),
        valid_sets: entries.remove("ValidSets"),
        trai: entries.remove("TRAI"),
    };
    output::render(format, &view)
}
