//! `keyprops verify` command.

use std::path::Path;

use anyhow::{Context, Result};
use keyprops_core::credentials::CredentialStore;
use keyprops_core::project::FlutterProject;
use keyprops_core::signing::{configure_release_signing, inspect_keystore, BuildVariant};

/// Runs the same completeness check the packaging step performs right
/// before signing, without building anything.
pub async fn handle_verify(project_root: &Path) -> Result<()> {
    let project = FlutterProject::locate(project_root)?;
    let store = CredentialStore::load(&project.key_properties_path()).await?;

    let mut release = BuildVariant::new("release");
    let profile = configure_release_signing(&mut release, &store);

    let resolved = profile
        .resolve(&project.android_dir())
        .context("Release signing is not usable")?;
    let keystore_type = inspect_keystore(&resolved.store_file).await?;

    println!("Release signing configuration is complete.");
    println!();
    println!(
        "  Keystore: {} ({})",
        resolved.store_file.display(),
        keystore_type
    );
    println!("  Alias:    {}", resolved.key_alias);

    Ok(())
}
