//! `keyprops status` command.

use std::path::Path;

use anyhow::Result;
use keyprops_core::credentials::{CredentialStore, StoreSource};
use keyprops_core::project::FlutterProject;
use keyprops_core::signing::{
    configure_release_signing, inspect_keystore, BuildVariant, SigningStatus, KEY_KEY_ALIAS,
    KEY_KEY_PASSWORD, KEY_STORE_FILE, KEY_STORE_PASSWORD,
};

pub async fn handle_status(project_root: &Path, json: bool) -> Result<()> {
    let project = FlutterProject::locate(project_root)?;
    let store = CredentialStore::load(&project.key_properties_path()).await?;

    let mut release = BuildVariant::new("release");
    let profile = configure_release_signing(&mut release, &store);

    let android_dir = project.android_dir();
    let resolved = profile.store_file_path(&android_dir);
    let keystore_exists = resolved.as_deref().is_some_and(Path::is_file);
    let keystore_type = match resolved.as_deref() {
        Some(path) if keystore_exists => Some(inspect_keystore(path).await?),
        _ => None,
    };

    if json {
        let status = SigningStatus {
            credential_file: match store.source() {
                StoreSource::File(path) => Some(path.display().to_string()),
                StoreSource::Absent => None,
            },
            store_password_set: profile.store_password.is_some(),
            key_password_set: profile.key_password.is_some(),
            key_alias: profile.key_alias.clone(),
            store_file: profile.store_file.clone(),
            store_file_resolved: resolved.as_ref().map(|p| p.display().to_string()),
            keystore_exists,
            keystore_type,
        };
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("Release Signing Status");
    println!("{}", "=".repeat(50));
    println!();

    match store.source() {
        StoreSource::Absent => {
            println!(
                "Credential store: none ({} not found)",
                project.key_properties_path().display()
            );
            println!("Release builds stay unsigned. Run 'keyprops init' to create one.");
        }
        StoreSource::File(path) => {
            println!("Credential store: {}", path.display());
        }
    }
    println!();

    let set_or_missing = |set: bool| if set { "set" } else { "missing" };
    println!(
        "  {:<15} {}",
        format!("{}:", KEY_STORE_PASSWORD),
        set_or_missing(profile.store_password.is_some())
    );
    println!(
        "  {:<15} {}",
        format!("{}:", KEY_KEY_PASSWORD),
        set_or_missing(profile.key_password.is_some())
    );
    println!(
        "  {:<15} {}",
        format!("{}:", KEY_KEY_ALIAS),
        profile.key_alias.as_deref().unwrap_or("missing")
    );
    println!(
        "  {:<15} {}",
        format!("{}:", KEY_STORE_FILE),
        profile.store_file.as_deref().unwrap_or("missing")
    );
    println!();

    match (&resolved, keystore_type) {
        (Some(path), Some(format)) => println!("Keystore: {} ({})", path.display(), format),
        (Some(path), None) => println!("Keystore: {} (missing on disk)", path.display()),
        (None, _) => println!("Keystore: not configured"),
    }

    let platforms: Vec<&str> = project
        .detect_platforms()
        .iter()
        .map(|p| p.as_str())
        .collect();
    if !platforms.is_empty() {
        println!("Platforms: {}", platforms.join(", "));
    }

    Ok(())
}
