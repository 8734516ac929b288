use std::fs;
use std::path::{Path, PathBuf};

use toml_edit::{DocumentMut, Item};

use crate::error::{ReleaseError, Result};

use super::VersionFileUpdater;

const MANIFEST_NAME: &str = "Cargo.toml";

/// Sets the version in the project's `Cargo.toml`.
///
/// Writes `package.version`, or `workspace.package.version` for a virtual
/// manifest. Formatting and comments are preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct CargoUpdater;

impl VersionFileUpdater for CargoUpdater {
    fn update(&self, project_dir: &Path, version: &str) -> Result<Vec<PathBuf>> {
        let path = project_dir.join(MANIFEST_NAME);
        let contents = fs::read_to_string(&path).map_err(|e| {
            ReleaseError::update(format!("Cannot read '{}': {}", path.display(), e))
        })?;

        let mut doc: DocumentMut = contents.parse()?;
        set_manifest_version(&mut doc, version)?;
        fs::write(&path, doc.to_string())?;

        tracing::info!(path = %path.display(), version, "updated cargo manifest");
        Ok(vec![path])
    }
}

fn set_manifest_version(doc: &mut DocumentMut, version: &str) -> Result<()> {
    let package = if doc.contains_table("package") {
        &mut doc["package"]
    } else if doc
        .get("workspace")
        .and_then(|ws| ws.get("package"))
        .is_some_and(Item::is_table)
    {
        &mut doc["workspace"]["package"]
    } else {
        return Err(ReleaseError::update(format!(
            "{} has no [package] table",
            MANIFEST_NAME
        )));
    };

    // `version.workspace = true` delegates to the workspace root.
    if package.get("version").is_some_and(|v| !v.is_str()) {
        return Err(ReleaseError::update(
            "package version is inherited; update the workspace manifest instead",
        ));
    }

    package["version"] = toml_edit::value(version);
    Ok(())
}
