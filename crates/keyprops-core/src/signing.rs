//! Release signing profile assembly and keystore inspection.
//!
//! Profile construction is total: an empty credential store still yields a
//! profile, and missing credentials surface only when a signing consumer
//! resolves the profile immediately before use.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::credentials::{CredentialStore, KEY_PROPERTIES_FILE};
use crate::error::{KeypropsError, Result};

/// Keys recognized in the credential store.
pub const KEY_STORE_PASSWORD: &str = "storePassword";
pub const KEY_KEY_PASSWORD: &str = "keyPassword";
pub const KEY_KEY_ALIAS: &str = "keyAlias";
pub const KEY_STORE_FILE: &str = "storeFile";

/// Signing configuration for one build variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningProfile {
    pub store_password: Option<String>,
    pub key_password: Option<String>,
    pub key_alias: Option<String>,
    /// Keystore path exactly as written in the store; resolved against the
    /// android directory only when signing is attempted.
    pub store_file: Option<String>,
}

impl SigningProfile {
    /// Builds a profile from a credential store.
    ///
    /// Never fails; absent keys leave the corresponding fields unset.
    pub fn from_store(store: &CredentialStore) -> Self {
        Self {
            store_password: store.get(KEY_STORE_PASSWORD).map(str::to_owned),
            key_password: store.get(KEY_KEY_PASSWORD).map(str::to_owned),
            key_alias: store.get(KEY_KEY_ALIAS).map(str::to_owned),
            store_file: store.get(KEY_STORE_FILE).map(str::to_owned),
        }
    }

    /// Resolves the raw `storeFile` value against the android directory.
    ///
    /// Absolute paths pass through unchanged. `None` means the store file
    /// is not configured, which is not an error at this stage.
    pub fn store_file_path(&self, android_dir: &Path) -> Option<PathBuf> {
        self.store_file.as_ref().map(|raw| {
            let path = Path::new(raw);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                android_dir.join(path)
            }
        })
    }

    /// Validates the profile for actual signing use.
    ///
    /// Configuration never checks completeness; the signing consumer calls
    /// this right before it needs the fields.
    pub fn resolve(&self, android_dir: &Path) -> Result<ResolvedSigning> {
        let store_password = self
            .store_password
            .clone()
            .ok_or(KeypropsError::MissingField(KEY_STORE_PASSWORD))?;
        let key_password = self
            .key_password
            .clone()
            .ok_or(KeypropsError::MissingField(KEY_KEY_PASSWORD))?;
        let key_alias = self
            .key_alias
            .clone()
            .ok_or(KeypropsError::MissingField(KEY_KEY_ALIAS))?;
        let store_file = self
            .store_file_path(android_dir)
            .ok_or(KeypropsError::MissingField(KEY_STORE_FILE))?;

        if !store_file.is_file() {
            return Err(KeypropsError::KeystoreNotFound(store_file));
        }

        Ok(ResolvedSigning {
            store_password,
            key_password,
            key_alias,
            store_file,
        })
    }
}

/// A signing profile with every field present and the keystore located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSigning {
    pub store_password: String,
    pub key_password: String,
    pub key_alias: String,
    pub store_file: PathBuf,
}

/// A named build configuration with a signing slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildVariant {
    name: String,
    signing: Option<SigningProfile>,
}

impl BuildVariant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signing: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signing(&self) -> Option<&SigningProfile> {
        self.signing.as_ref()
    }

    /// Attaches a signing profile, replacing any previous one. Never
    /// merges.
    pub fn attach_signing(&mut self, profile: SigningProfile) {
        self.signing = Some(profile);
    }
}

/// Configures release signing on `variant` from the credential store and
/// returns the attached profile.
pub fn configure_release_signing(
    variant: &mut BuildVariant,
    store: &CredentialStore,
) -> SigningProfile {
    let profile = SigningProfile::from_store(store);
    variant.attach_signing(profile.clone());
    profile
}

/// Android keystore container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeystoreType {
    Jks,
    Pkcs12,
}

impl KeystoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeystoreType::Jks => "jks",
            KeystoreType::Pkcs12 => "pkcs12",
        }
    }
}

impl std::fmt::Display for KeystoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Detects the keystore type from its magic bytes.
///
/// JKS files start with 0xFEEDFEED; everything else is reported as PKCS12.
pub fn detect_keystore_type(data: &[u8]) -> KeystoreType {
    if data.starts_with(&[0xFE, 0xED, 0xFE, 0xED]) {
        KeystoreType::Jks
    } else {
        KeystoreType::Pkcs12
    }
}

/// Reads a keystore file and reports its container format.
pub async fn inspect_keystore(path: &Path) -> Result<KeystoreType> {
    let data = tokio::fs::read(path).await?;
    Ok(detect_keystore_type(&data))
}

/// Writes `android/key.properties` for the given profile.
///
/// Only fields present on the profile are written, so a written store
/// loads back to an equal profile.
pub async fn write_key_properties(android_dir: &Path, profile: &SigningProfile) -> Result<()> {
    if !android_dir.is_dir() {
        return Err(KeypropsError::AndroidDirMissing(android_dir.to_path_buf()));
    }

    let mut entries = HashMap::new();
    if let Some(v) = &profile.store_password {
        entries.insert(KEY_STORE_PASSWORD.to_string(), v.clone());
    }
    if let Some(v) = &profile.key_password {
        entries.insert(KEY_KEY_PASSWORD.to_string(), v.clone());
    }
    if let Some(v) = &profile.key_alias {
        entries.insert(KEY_KEY_ALIAS.to_string(), v.clone());
    }
    if let Some(v) = &profile.store_file {
        entries.insert(KEY_STORE_FILE.to_string(), v.clone());
    }

    let path = android_dir.join(KEY_PROPERTIES_FILE);
    let content = CredentialStore::from_entries(entries).render();
    tokio::fs::write(&path, content).await?;

    tracing::debug!("Wrote {}", path.display());

    Ok(())
}

/// Removes `android/key.properties` if present. A missing file is a no-op.
pub async fn remove_key_properties(android_dir: &Path) -> Result<()> {
    let path = android_dir.join(KEY_PROPERTIES_FILE);
    if path.exists() {
        tokio::fs::remove_file(&path).await?;
        tracing::debug!("Removed {}", path.display());
    }
    Ok(())
}

/// Release signing status for a checkout. Carries no secret values.
#[derive(Debug, Clone, Serialize)]
pub struct SigningStatus {
    /// Credential store path, when one was loaded.
    pub credential_file: Option<String>,
    pub store_password_set: bool,
    pub key_password_set: bool,
    pub key_alias: Option<String>,
    /// Raw `storeFile` value from the store.
    pub store_file: Option<String>,
    /// Keystore path after resolution against the android directory.
    pub store_file_resolved: Option<String>,
    pub keystore_exists: bool,
    pub keystore_type: Option<KeystoreType>,
}
