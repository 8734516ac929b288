//! HTML documentation for the project's protobuf definitions via
//! `protoc-gen-doc`.

use std::path::Path;
use std::process::{Command, ExitStatus};

use crate::config::ProtoDocsConfig;
use crate::error::{ReleaseError, Result};

/// A `protoc --doc_out` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoDocs {
    pub out_dir: String,
    pub paths: Vec<String>,
}

impl ProtoDocs {
    /// Build from the `[docs.proto]` table, optionally overriding the output dir
    pub fn from_config(config: &ProtoDocsConfig, out_dir: Option<&str>) -> Result<Self> {
        let paths: Vec<String> = config
            .paths
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        if paths.is_empty() {
            return Err(ReleaseError::config("[docs.proto] paths is empty"));
        }

        Ok(ProtoDocs {
            out_dir: out_dir.unwrap_or(&config.out_dir).to_string(),
            paths,
        })
    }

    /// Arguments passed to `protoc`
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--doc_out={}", self.out_dir),
            "--doc_opt=html,proto.html".to_string(),
        ];
        args.extend(self.paths.iter().cloned());
        args
    }

    /// Run `protoc` in `project_dir` with inherited stdio
    pub fn run(&self, project_dir: &Path) -> Result<ExitStatus> {
        let args = self.args();
        tracing::info!(?args, "generating proto documentation");

        let status = Command::new("protoc")
            .args(&args)
            .current_dir(project_dir)
            .status()?;

        if !status.success() {
            tracing::warn!(code = ?status.code(), "protoc exited with failure");
        }
        Ok(status)
    }
}
