//! Error types for the keyprops core library.

use std::path::PathBuf;

use thiserror::Error;

/// Core error type for keyprops operations.
#[derive(Error, Debug)]
pub enum KeypropsError {
    #[error("Cannot read credential store {path}: {source}")]
    CredentialsUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {message}")]
    CredentialsParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Signing credential '{0}' is not configured")]
    MissingField(&'static str),

    #[error("Keystore file not found: {0}")]
    KeystoreNotFound(PathBuf),

    #[error("Not a Flutter project (no pubspec.yaml): {0}")]
    ProjectNotFound(PathBuf),

    #[error("Android directory not found: {0}")]
    AndroidDirMissing(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for keyprops operations.
pub type Result<T> = std::result::Result<T, KeypropsError>;
