//! `keyprops clean` command.

use std::path::Path;

use anyhow::Result;
use keyprops_core::project::FlutterProject;
use keyprops_core::signing::remove_key_properties;

pub async fn handle_clean(project_root: &Path) -> Result<()> {
    let project = FlutterProject::locate(project_root)?;
    let path = project.key_properties_path();
    let existed = path.exists();

    remove_key_properties(&project.android_dir()).await?;

    if existed {
        println!("Removed {}", path.display());
    } else {
        println!("Nothing to remove; {} does not exist.", path.display());
    }

    Ok(())
}
