//! `keyprops init` command.

use std::path::Path;

use anyhow::{bail, Result};
use clap::Args;
use keyprops_core::project::FlutterProject;
use keyprops_core::signing::{write_key_properties, SigningProfile};

#[derive(Args)]
pub struct InitArgs {
    /// Path to the keystore file, absolute or relative to android/
    #[arg(long)]
    pub store_file: String,

    /// Keystore password
    #[arg(long, env = "KEYPROPS_STORE_PASSWORD", hide_env_values = true)]
    pub store_password: String,

    /// Identifier of the signing key within the keystore
    #[arg(long)]
    pub key_alias: String,

    /// Password for the signing key
    #[arg(long, env = "KEYPROPS_KEY_PASSWORD", hide_env_values = true)]
    pub key_password: String,

    /// Overwrite an existing key.properties
    #[arg(long)]
    pub force: bool,
}

pub async fn handle_init(project_root: &Path, args: InitArgs) -> Result<()> {
    let project = FlutterProject::locate(project_root)?;

    if !project.has_android() {
        bail!(
            "Project at {} has no android/ directory; nothing to configure.",
            project.root().display()
        );
    }

    let path = project.key_properties_path();
    if path.exists() && !args.force {
        bail!("{} already exists. Use --force to overwrite.", path.display());
    }

    let profile = SigningProfile {
        store_password: Some(args.store_password),
        key_password: Some(args.key_password),
        key_alias: Some(args.key_alias),
        store_file: Some(args.store_file),
    };

    write_key_properties(&project.android_dir(), &profile).await?;

    println!("Wrote {}", path.display());
    println!();
    println!("Keep this file out of version control; it holds signing secrets.");

    Ok(())
}
