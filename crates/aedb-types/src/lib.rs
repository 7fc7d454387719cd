//! Core types shared by the aedb crates.
//!
//! Nothing in here touches storage: the typed [`Value`] with its literal
//! decoder, and the naming conventions of the pridb/tradb/trfdb file kinds.

pub mod error;
mod literal;
mod tables;
mod value;

pub use error::{Error, Result};
pub use literal::{decode_literal, parse_literal};
pub use tables::{FileKind, TableSet};
pub use value::Value;
