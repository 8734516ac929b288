use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReleaseError, Result};

use super::VersionFileUpdater;

const VERSION_FILE_NAME: &str = "_version.py";

/// Directories never searched for a version file.
const SKIPPED_DIRS: &[&str] = &["target", "node_modules", "__pycache__"];

/// Rewrites the package's `_version.py`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonUpdater;

impl VersionFileUpdater for PythonUpdater {
    fn update(&self, project_dir: &Path, version: &str) -> Result<Vec<PathBuf>> {
        let path = find_version_file(project_dir)?.ok_or_else(|| {
            ReleaseError::update(format!(
                "no {} found under '{}'",
                VERSION_FILE_NAME,
                project_dir.display()
            ))
        })?;

        fs::write(&path, format!("__version__ = \"{}\"\n", version))?;
        tracing::info!(path = %path.display(), version, "updated python version file");
        Ok(vec![path])
    }
}

/// First `_version.py` under `dir`. Files of a directory are checked before
/// its subdirectories, and entries are visited in name order.
pub fn find_version_file(dir: &Path) -> Result<Option<PathBuf>> {
    let mut entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut subdirs = Vec::new();
    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type()?;
        let name = entry.file_name().to_string_lossy().into_owned();

        if file_type.is_file() && name == VERSION_FILE_NAME {
            return Ok(Some(path));
        }
        if file_type.is_dir() && !name.starts_with('.') && !SKIPPED_DIRS.contains(&name.as_str()) {
            subdirs.push(path);
        }
    }

    for subdir in subdirs {
        if let Some(found) = find_version_file(&subdir)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}
