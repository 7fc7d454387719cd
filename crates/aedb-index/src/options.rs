use aedb_types::FileKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, Result};

/// Construction parameters for [`crate::Database::open`].
///
/// Deserializable so the same settings can come from a TOML section:
///
/// ```toml
/// table_prefix = "pri"
/// readonly = false
/// required_file_ext = "pridb"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenOptions {
    pub table_prefix: String,
    #[serde(default = "default_readonly")]
    pub readonly: bool,
    #[serde(default)]
    pub required_file_ext: Option<String>,
}

fn default_readonly() -> bool {
    true
}

impl OpenOptions {
    /// Read-only, no extension requirement.
    pub fn new(table_prefix: impl Into<String>) -> Self {
        Self {
            table_prefix: table_prefix.into(),
            readonly: true,
            required_file_ext: None,
        }
    }

    /// Prefix and required extension of one of the AE file kinds.
    pub fn for_kind(kind: FileKind) -> Self {
        Self::new(kind.prefix()).required_file_ext(kind.extension())
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn required_file_ext(mut self, ext: impl Into<String>) -> Self {
        self.required_file_ext = Some(ext.into());
        self
    }

    pub(crate) fn check_extension(&self, path: &Path) -> Result<()> {
        let Some(required) = &self.required_file_ext else {
            return Ok(());
        };

        let found = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        if found.to_lowercase() != required.to_lowercase() {
            return Err(Error::InvalidFormat {
                found,
                required: required.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_to_readonly() {
        let options = OpenOptions::new("pri");
        assert!(options.readonly);
        assert_eq!(options.required_file_ext, None);

        let options = options.readonly(false).required_file_ext("pridb");
        assert!(!options.readonly);
        assert_eq!(options.required_file_ext.as_deref(), Some("pridb"));
    }

    #[test]
    fn test_for_kind() {
        let options = OpenOptions::for_kind(FileKind::Trf);
        assert_eq!(options.table_prefix, "trf");
        assert_eq!(options.required_file_ext.as_deref(), Some("trfdb"));
        assert!(options.readonly);
    }

    #[test]
    fn test_extension_check_ignores_case() {
        let options = OpenOptions::new("pri").required_file_ext("pridb");
        for name in ["a.pridb", "a.PRIDB", "a.PriDb", "dir.x/a.pRiDB"] {
            assert!(options.check_extension(Path::new(name)).is_ok(), "{}", name);
        }

        let err = options
            .check_extension(Path::new("a.tradb"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidFormat { ref found, ref required }
                if found == "tradb" && required == "pridb"
        ));

        assert!(matches!(
            options.check_extension(Path::new("pridb")),
            Err(Error::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_no_requirement_accepts_anything() {
        let options = OpenOptions::new("pri");
        assert!(options.check_extension(Path::new("measurement.sqlite")).is_ok());
        assert!(options.check_extension(Path::new("noext")).is_ok());
    }

    #[test]
    fn test_deserialize_from_toml() {
        let options: OpenOptions = toml::from_str(
            r#"
            table_prefix = "tra"
            required_file_ext = "tradb"
            "#,
        )
        .unwrap();

        assert_eq!(options, OpenOptions::for_kind(FileKind::Tra));
    }
}
