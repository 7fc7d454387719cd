use thiserror::Error;

/// Result type for aedb-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug, Error)]
pub enum Error {
    /// Name is neither a known table prefix nor a known file extension
    #[error("Unknown file kind '{0}' (expected one of: pri, tra, trf)")]
    UnknownFileKind(String),
}
