use crate::types::{LogLevel, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aedb")]
#[command(about = "Inspect acoustic-emission pridb/tradb/trfdb files", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    /// Config file (default: $AEDB_CONFIG, then <config dir>/aedb/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Table prefix; inferred from the file extension when omitted
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Required file extension
    #[arg(long, global = true)]
    pub ext: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show mode, row count, columns and tables of a file
    Info { file: PathBuf },

    /// Show the decoded global-info table
    Globalinfo { file: PathBuf },

    /// Show the parameter table, or one record with --id
    Params {
        file: PathBuf,

        #[arg(long)]
        id: Option<i64>,
    },

    /// Show the field-info table
    Fieldinfo { file: PathBuf },

    /// Recompute ValidSets and TRAI in the global-info table from the data table
    Refresh { file: PathBuf },
}
