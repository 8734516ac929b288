//! Subcommand workflows
//!
//! Each helper the pipeline calls is a function here taking plain arguments,
//! so the workflows can be driven from tests without going through clap or
//! the process environment.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use crate::config::{self, Config, ConfigLocation};
use crate::coverage::{self, CoverageFormat, CoverageReport};
use crate::error::{ReleaseError, Result};
use crate::git::{self, TagSource};
use crate::language::Language;
use crate::pipeline::{Dialect, PipelineEmitter, RELEASE_VERSION, REPO_NAME, SERVICE_NAME};
use crate::protodoc::ProtoDocs;
use crate::resolver::{self, ReleaseDecision};

/// Project directory plus the configuration found for it
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub project_dir: PathBuf,
    pub config_path: Option<PathBuf>,
    pub config_location: Option<ConfigLocation>,
    pub config: Config,
}

impl ProjectContext {
    /// Locate and load the configuration for `project_dir`
    pub fn load(project_dir: impl Into<PathBuf>, config_path: Option<&Path>) -> Result<Self> {
        let project_dir = project_dir.into();
        let (config_path, config_location) =
            config::locate_config(config_path, &project_dir).unzip();
        let config = config::load_config(config_path.as_deref())?;

        Ok(ProjectContext {
            project_dir,
            config_path,
            config_location,
            config,
        })
    }

    /// Config file the released version is recorded in.
    ///
    /// `None` for defaults and for the shared user config, which is not
    /// tied to one project.
    pub fn release_record_path(&self) -> Option<&Path> {
        match self.config_location {
            Some(location) if location.is_project_owned() => self.config_path.as_deref(),
            _ => None,
        }
    }

    /// Emitter from `[pipeline]`, with an optional dialect override
    pub fn emitter(&self, dialect: Option<Dialect>) -> Result<PipelineEmitter> {
        PipelineEmitter::from_config(&self.config.pipeline, dialect)
    }
}

/// Arguments for the next-version workflow
#[derive(Debug, Clone, PartialEq)]
pub struct NextVersionArgs {
    pub language: Language,

    pub dialect: Option<Dialect>,

    /// Update version files and record the release in the config
    pub write: bool,
}

/// Result of a successful next-version run
#[derive(Debug, Clone, PartialEq)]
pub struct NextVersionResult {
    pub release: ReleaseDecision,

    /// Version files rewritten for the language, config file last
    pub updated_files: Vec<PathBuf>,
}

/// Resolve the next release and publish it to the pipeline.
///
/// 1. Read the target major.minor (fails before any remote call)
/// 2. List remote tags and resolve the next patch
/// 3. Write the version into the language's files and the config
/// 4. Emit `RELEASE_VERSION`
///
/// Nothing is written or emitted unless every earlier step succeeded.
pub fn run_next_version<S, W>(
    ctx: &ProjectContext,
    args: &NextVersionArgs,
    source: &S,
    out: &mut W,
) -> Result<NextVersionResult>
where
    S: TagSource + ?Sized,
    W: Write,
{
    let target = ctx.config.target()?;
    let emitter = ctx.emitter(args.dialect)?;

    tracing::info!(line = %target, language = %args.language, "resolving next release");
    let release = resolver::next_release(target, source)?;
    let version = release.to_string();

    let mut updated_files = Vec::new();
    if args.write {
        updated_files = args
            .language
            .updater()
            .update(&ctx.project_dir, &version)?;

        if let Some(path) = ctx.release_record_path() {
            config::write_release(path, &version)?;
            updated_files.push(path.to_path_buf());
        } else if let Some(path) = &ctx.config_path {
            tracing::debug!(path = %path.display(), "not recording release in shared user config");
        }
    }

    emitter.emit(RELEASE_VERSION, &version, out)?;

    Ok(NextVersionResult {
        release,
        updated_files,
    })
}

/// Check the coverage report against the configured minimum.
///
/// `report` is resolved against the project dir; `minimum` overrides
/// `[testing] coverage_required`.
pub fn run_check_coverage(
    ctx: &ProjectContext,
    format: CoverageFormat,
    report: Option<&Path>,
    minimum: Option<f64>,
) -> Result<CoverageReport> {
    let minimum = minimum.unwrap_or_else(|| ctx.config.coverage_required());
    if !(0.0..=1.0).contains(&minimum) {
        return Err(ReleaseError::config(format!(
            "coverage minimum {} is not a ratio between 0 and 1",
            minimum
        )));
    }

    let report_path = match report {
        Some(path) => ctx.project_dir.join(path),
        None => ctx.project_dir.join(format.default_report_path()),
    };

    coverage::check_coverage(&report_path, format, minimum)
}

/// Emit `REPO_NAME` from the `origin` remote
pub fn run_repo_name<W: Write>(
    ctx: &ProjectContext,
    dialect: Option<Dialect>,
    out: &mut W,
) -> Result<String> {
    let emitter = ctx.emitter(dialect)?;
    let name = git::origin_repo_name(&ctx.project_dir)?;
    emitter.emit(REPO_NAME, &name, out)?;
    Ok(name)
}

/// Emit `SERVICE_NAME` from `[metadata] name`
pub fn run_service_name<W: Write>(
    ctx: &ProjectContext,
    dialect: Option<Dialect>,
    out: &mut W,
) -> Result<String> {
    let emitter = ctx.emitter(dialect)?;
    let name = ctx.config.service_name()?.to_string();
    emitter.emit(SERVICE_NAME, &name, out)?;
    Ok(name)
}

/// Generate proto HTML docs, returning protoc's exit status
pub fn run_proto_docs(ctx: &ProjectContext, out_dir: Option<&str>) -> Result<ExitStatus> {
    ProtoDocs::from_config(&ctx.config.docs.proto, out_dir)?.run(&ctx.project_dir)
}
