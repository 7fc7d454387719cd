// Thin collaborator over aedb-index: every command opens one file, reads or
// refreshes it, and closes it before printing.

mod args;
mod commands;
pub mod config;
mod handlers;
pub mod logging;
mod output;
pub mod types;

pub use args::{Cli, Commands};
pub use commands::run;
