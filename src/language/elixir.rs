use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ReleaseError, Result};

use super::VersionFileUpdater;

const MIX_FILE: &str = "mix.exs";

fn mix_version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"version: "\d+\.\d+\.\d+","#).expect("mix version pattern is a valid regex")
    })
}

/// Replaces the `version: "X.Y.Z",` entry of `mix.exs`.
///
/// Only the first entry is the project's own; later ones belong to
/// dependency options and stay as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct MixUpdater;

impl VersionFileUpdater for MixUpdater {
    fn update(&self, project_dir: &Path, version: &str) -> Result<Vec<PathBuf>> {
        let path = project_dir.join(MIX_FILE);
        let contents = fs::read_to_string(&path).map_err(|e| {
            ReleaseError::update(format!("Cannot read '{}': {}", path.display(), e))
        })?;

        if !mix_version_regex().is_match(&contents) {
            return Err(ReleaseError::update(format!(
                "no version entry found in '{}'",
                path.display()
            )));
        }

        let replacement = format!("version: \"{}\",", version);
        let updated = mix_version_regex().replacen(&contents, 1, regex::NoExpand(&replacement));
        fs::write(&path, updated.as_ref())?;

        tracing::info!(path = %path.display(), version, "updated mix project version");
        Ok(vec![path])
    }
}
