//! Per-language release strategies
//!
//! Each [Language] names two strategies: where the existing release tags
//! come from and which project files carry the version string. All
//! languages currently list tags from git so that the package registries
//! and the repository cannot drift apart; only the file updaters differ.

pub mod elixir;
pub mod python;
pub mod rust;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ReleaseError, Result};
use crate::git::{LsRemote, TagSource};

/// Environment variable the pipeline uses to select the language.
pub const LANGUAGE_ENV: &str = "PublishLanguage";

/// Writes a release version into a project's version files
pub trait VersionFileUpdater {
    /// Update the files under `project_dir`, returning the paths written
    fn update(&self, project_dir: &Path, version: &str) -> Result<Vec<PathBuf>>;
}

/// Language of the project being released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    Go,
    Rust,
    Elixir,
    PythonService,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Python,
        Language::Go,
        Language::Rust,
        Language::Elixir,
        Language::PythonService,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Elixir => "elixir",
            Language::PythonService => "python-service",
        }
    }

    /// Tag listing strategy for this language
    pub fn tag_source(&self, project_dir: &Path) -> Box<dyn TagSource> {
        Box::new(LsRemote::new(project_dir))
    }

    /// Version file strategy for this language
    pub fn updater(&self) -> Box<dyn VersionFileUpdater> {
        match self {
            Language::Python | Language::PythonService => Box::new(python::PythonUpdater),
            Language::Rust => Box::new(rust::CargoUpdater),
            Language::Elixir => Box::new(elixir::MixUpdater),
            Language::Go => Box::new(NoopUpdater),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = ReleaseError;

    /// Case-insensitive; `_` and `-` are interchangeable (`PYTHON_SERVICE`).
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Language::ALL
            .into_iter()
            .find(|lang| lang.name() == normalized)
            .ok_or_else(|| ReleaseError::config(format!("unknown publish language '{}'", s)))
    }
}

/// Go modules are versioned by their tags alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopUpdater;

impl VersionFileUpdater for NoopUpdater {
    fn update(&self, _project_dir: &Path, _version: &str) -> Result<Vec<PathBuf>> {
        Ok(Vec::new())
    }
}
