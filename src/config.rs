use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::DocumentMut;

use crate::domain::TargetSelector;
use crate::error::{ReleaseError, Result};
use crate::pipeline::Dialect;

/// File name looked up in the project directory.
pub const CONFIG_FILE_NAME: &str = "release.toml";

/// Coverage ratio required when the config does not set one.
pub const DEFAULT_COVERAGE_REQUIRED: f64 = 0.85;

/// Represents the complete configuration for ci-release.
///
/// Holds the release line being targeted, project metadata and the settings
/// of the peripheral pipeline helpers.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub version: VersionConfig,

    #[serde(default)]
    pub metadata: MetadataConfig,

    #[serde(default)]
    pub testing: TestingConfig,

    #[serde(default)]
    pub docs: DocsConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// `[version]` table.
///
/// `target` is the major.minor line to release from; `release` is written
/// back after every resolution.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct VersionConfig {
    pub target: Option<String>,
    pub release: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct MetadataConfig {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct TestingConfig {
    pub coverage_required: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct DocsConfig {
    #[serde(default)]
    pub proto: ProtoDocsConfig,
}

/// Returns the default output directory for generated proto docs.
fn default_proto_out_dir() -> String {
    "./zdocs/source/_static".to_string()
}

/// `[docs.proto]` table: the proto files handed to `protoc`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProtoDocsConfig {
    #[serde(default)]
    pub paths: Vec<String>,

    #[serde(default = "default_proto_out_dir")]
    pub out_dir: String,
}

impl Default for ProtoDocsConfig {
    fn default() -> Self {
        ProtoDocsConfig {
            paths: Vec::new(),
            out_dir: default_proto_out_dir(),
        }
    }
}

/// `[pipeline]` table: how variables are handed to the CI orchestrator.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct PipelineConfig {
    #[serde(default)]
    pub dialect: Dialect,

    /// Line template for [`Dialect::Template`], with `{name}` and `{value}`
    pub template: Option<String>,
}

impl Config {
    /// The major.minor line to release from
    pub fn target(&self) -> Result<TargetSelector> {
        self.version
            .target
            .as_deref()
            .ok_or_else(|| ReleaseError::config("[version] target is not set"))?
            .parse()
    }

    /// Project name from `[metadata] name`
    pub fn service_name(&self) -> Result<&str> {
        self.metadata
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ReleaseError::config("[metadata] name is not set"))
    }

    /// Minimum coverage ratio, falling back to [`DEFAULT_COVERAGE_REQUIRED`]
    pub fn coverage_required(&self) -> f64 {
        self.testing
            .coverage_required
            .unwrap_or(DEFAULT_COVERAGE_REQUIRED)
    }
}

/// Where a configuration file was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLocation {
    /// Given with `--config`
    Explicit,
    /// `release.toml` in the project directory
    Project,
    /// Shared file in the user config directory
    User,
}

impl ConfigLocation {
    /// Whether per-project state such as the released version may be
    /// written back to this file
    pub fn is_project_owned(self) -> bool {
        !matches!(self, ConfigLocation::User)
    }
}

/// Finds the configuration file to use.
///
/// Looks in the following order:
/// 1. Custom path provided as parameter (returned even if missing, so the
///    read reports it)
/// 2. `release.toml` in the project directory
/// 3. `ci-release/release.toml` in the user config directory
pub fn find_config(config_path: Option<&Path>, project_dir: &Path) -> Option<PathBuf> {
    locate_config(config_path, project_dir).map(|(path, _)| path)
}

/// Same lookup as [`find_config`], also reporting which step matched
pub fn locate_config(
    config_path: Option<&Path>,
    project_dir: &Path,
) -> Option<(PathBuf, ConfigLocation)> {
    if let Some(path) = config_path {
        return Some((path.to_path_buf(), ConfigLocation::Explicit));
    }

    let local = project_dir.join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some((local, ConfigLocation::Project));
    }

    dirs::config_dir()
        .map(|dir| dir.join("ci-release").join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
        .map(|path| (path, ConfigLocation::User))
}

/// Loads configuration from file or returns defaults.
///
/// # Returns
/// * `Ok(Config)` - Loaded configuration, or defaults when `config_path` is `None`
/// * `Err` - If the file cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let Some(path) = config_path else {
        tracing::debug!("no configuration file found, using defaults");
        return Ok(Config::default());
    };

    tracing::debug!(path = %path.display(), "loading configuration");
    let config_str = fs::read_to_string(path).map_err(|e| {
        ReleaseError::config(format!("Cannot read '{}': {}", path.display(), e))
    })?;

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}

/// Records the released version as `[version] release` in the config file.
///
/// The rest of the document, comments included, is left untouched.
pub fn write_release(config_path: &Path, release: &str) -> Result<()> {
    let contents = fs::read_to_string(config_path)?;
    let mut doc: DocumentMut = contents.parse()?;

    if !doc.contains_key("version") {
        doc["version"] = toml_edit::table();
    }
    // `version = { target = "1.4" }` is as valid as a `[version]` header
    let version = doc["version"].as_table_like_mut().ok_or_else(|| {
        ReleaseError::config(format!(
            "'version' in '{}' is not a table",
            config_path.display()
        ))
    })?;
    version.insert("release", toml_edit::value(release));

    fs::write(config_path, doc.to_string())?;
    tracing::info!(path = %config_path.display(), release, "recorded release in config");
    Ok(())
}
