//! Error types for Lambda packaging.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for the package module.
pub type Result<T> = std::result::Result<T, PackageError>;

/// Errors that can occur while building or zipping the function binary.
#[derive(Error, Debug)]
pub enum PackageError {
    #[error("cargo build exited with status {0}")]
    BuildFailed(i32),

    #[error("Expected Lambda binary at '{0}'")]
    BinaryMissing(PathBuf),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
