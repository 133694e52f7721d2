//! Loading and rendering the `key.properties` credential store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{KeypropsError, Result};
use crate::properties;

/// File name of the credential store inside the `android/` directory.
pub const KEY_PROPERTIES_FILE: &str = "key.properties";

/// Provenance of a [`CredentialStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSource {
    /// Not backed by a file. The normal state for checkouts that never
    /// produce a signed release artifact.
    Absent,
    /// Entries were parsed from this file.
    File(PathBuf),
}

/// Read-only signing credentials, keyed by the `key.properties` entry names.
///
/// Constructed once per invocation. A missing file yields an empty store;
/// a file that exists but cannot be read or parsed is a fatal error and is
/// never downgraded to an empty store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialStore {
    entries: HashMap<String, String>,
    source: StoreSource,
}

impl CredentialStore {
    /// An empty store, as produced when no credential file exists.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            source: StoreSource::Absent,
        }
    }

    /// Builds an in-memory store, e.g. for assembling a file to write.
    pub fn from_entries(entries: HashMap<String, String>) -> Self {
        Self {
            entries,
            source: StoreSource::Absent,
        }
    }

    /// Loads the store at `path`.
    ///
    /// A missing file is not an error; release builds simply stay
    /// unsigned until one is created.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No credential store at {}", path.display());
            return Ok(Self::empty());
        }

        let content = tokio::fs::read_to_string(path).await.map_err(|source| {
            KeypropsError::CredentialsUnreadable {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let entries =
            properties::parse(&content).map_err(|e| KeypropsError::CredentialsParse {
                path: path.to_path_buf(),
                line: e.line,
                message: e.message,
            })?;

        tracing::debug!(
            "Loaded {} credential entries from {}",
            entries.len(),
            path.display()
        );

        Ok(Self {
            entries,
            source: StoreSource::File(path.to_path_buf()),
        })
    }

    /// Looks up a credential by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Where this store came from.
    pub fn source(&self) -> &StoreSource {
        &self.source
    }

    /// Renders the entries back to properties text.
    pub fn render(&self) -> String {
        properties::render(&self.entries)
    }
}
