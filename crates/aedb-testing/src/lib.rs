//! Testing infrastructure for aedb integration tests.
//!
//! - `TestWorld`: isolated temporary directory holding sample files
//! - `fixtures`: builders for pridb/tradb/trfdb files with the standard layout

pub mod fixtures;
pub mod world;

pub use fixtures::SampleDb;
pub use world::TestWorld;
