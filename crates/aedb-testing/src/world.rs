//! TestWorld pattern for declarative integration test setup.

use aedb_types::FileKind;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::fixtures::SampleDb;

/// Isolated directory for sample files, removed on drop.
///
/// # Example
/// ```no_run
/// use aedb_testing::{SampleDb, TestWorld};
/// use aedb_types::FileKind;
///
/// let world = TestWorld::new();
/// let path = world.create("run.pridb", &SampleDb::new(FileKind::Pri).with_rows(3));
/// assert!(path.exists());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path inside the world; the file is not created.
    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Write `sample` to `name` and return its path.
    pub fn create(&self, name: &str, sample: &SampleDb) -> PathBuf {
        let path = self.path(name);
        sample
            .create(&path)
            .unwrap_or_else(|e| panic!("Failed to create sample {}: {}", name, e));
        path
    }

    /// Standard empty file of `kind` named `<stem>.<extension>`.
    pub fn create_kind(&self, stem: &str, kind: FileKind) -> PathBuf {
        self.create(
            &format!("{}.{}", stem, kind.extension()),
            &SampleDb::new(kind),
        )
    }
}
