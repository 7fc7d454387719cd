use crate::args::{Cli, Commands};
use crate::config::Config;
use crate::handlers;
use aedb_index::{FileKind, OpenOptions};
use anyhow::{Result, anyhow};
use std::path::Path;
use tracing::debug;

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let format = cli.format;

    match &cli.command {
        Commands::Info { file } => {
            let options = resolve_options(&cli, &config, file)?;
            handlers::info::handle(file, &options, format)
        }
        Commands::Globalinfo { file } => {
            let options = resolve_options(&cli, &config, file)?;
            handlers::globalinfo::handle(file, &options, format)
        }
        Commands::Params { file, id } => {
            let options = resolve_options(&cli, &config, file)?;
            handlers::params::handle(file, &options, *id, format)
        }
        Commands::Fieldinfo { file } => {
            let options = resolve_options(&cli, &config, file)?;
            handlers::fieldinfo::handle(file, &options, format)
        }
        Commands::Refresh { file } => {
            let options = resolve_options(&cli, &config, file)?;
            handlers::refresh::handle(file, &options, format)
        }
    }
}

/// Read-only options for `file`.
///
/// The table prefix comes from `--prefix`, then the config, then the file
/// kind implied by the extension. The extension requirement comes from
/// `--ext`, then the config.
fn resolve_options(cli: &Cli, config: &Config, file: &Path) -> Result<OpenOptions> {
    let prefix = cli
        .prefix
        .clone()
        .or_else(|| config.table_prefix.clone())
        .or_else(|| FileKind::from_path(file).map(|kind| kind.prefix().to_string()))
        .ok_or_else(|| {
            anyhow!(
                "Cannot infer table prefix for {} (use --prefix or a .pridb/.tradb/.trfdb file)",
                file.display()
            )
        })?;

    let mut options = OpenOptions::new(prefix);
    if let Some(ext) = cli.ext.clone().or_else(|| config.required_file_ext.clone()) {
        options = options.required_file_ext(ext);
    }

    debug!(
        prefix = %options.table_prefix,
        required_file_ext = ?options.required_file_ext,
        "resolved open options"
    );
    Ok(options)
}
