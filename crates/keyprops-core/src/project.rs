//! Flutter project layout detection.

use std::path::{Path, PathBuf};

use crate::credentials::KEY_PROPERTIES_FILE;
use crate::error::{KeypropsError, Result};

/// A validated Flutter project checkout.
///
/// The root is passed in explicitly by the caller; nothing here reads
/// ambient state such as the current directory.
#[derive(Debug, Clone)]
pub struct FlutterProject {
    root: PathBuf,
}

impl FlutterProject {
    /// Locates a Flutter project at `root`.
    ///
    /// A Flutter project is identified by the presence of `pubspec.yaml`.
    pub fn locate(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.join("pubspec.yaml").is_file() {
            return Err(KeypropsError::ProjectNotFound(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The Android module directory.
    pub fn android_dir(&self) -> PathBuf {
        self.root.join("android")
    }

    pub fn has_android(&self) -> bool {
        self.android_dir().is_dir()
    }

    /// Conventional credential store location, `android/key.properties`.
    pub fn key_properties_path(&self) -> PathBuf {
        self.android_dir().join(KEY_PROPERTIES_FILE)
    }

    /// Lists the platforms this project has platform directories for.
    pub fn detect_platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| self.root.join(p.as_str()).is_dir())
            .collect()
    }
}

/// Target platform directories a Flutter project can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
    MacOS,
    Linux,
    Windows,
    Web,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Android,
        Platform::Ios,
        Platform::MacOS,
        Platform::Linux,
        Platform::Windows,
        Platform::Web,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::MacOS => "macos",
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::Web => "web",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flutter_checkout() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pubspec.yaml"), "name: app\n").unwrap();
        dir
    }

    #[test]
    fn test_locate_requires_pubspec() {
        let dir = tempfile::tempdir().unwrap();
        let err = FlutterProject::locate(dir.path()).unwrap_err();
        assert!(matches!(err, KeypropsError::ProjectNotFound(_)));
    }

    #[test]
    fn test_locate_valid_project() {
        let dir = flutter_checkout();
        let project = FlutterProject::locate(dir.path()).unwrap();
        assert_eq!(project.root(), dir.path());
        assert_eq!(
            project.key_properties_path(),
            dir.path().join("android").join(KEY_PROPERTIES_FILE)
        );
    }

    #[test]
    fn test_detect_platforms() {
        let dir = flutter_checkout();
        std::fs::create_dir(dir.path().join("android")).unwrap();
        std::fs::create_dir(dir.path().join("web")).unwrap();

        let project = FlutterProject::locate(dir.path()).unwrap();
        assert!(project.has_android());
        assert_eq!(
            project.detect_platforms(),
            vec![Platform::Android, Platform::Web]
        );
    }
}
