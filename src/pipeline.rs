//! Pipeline variable emission.
//!
//! Every helper hands its result to the CI orchestrator as one line on
//! stdout. The line syntax belongs to the orchestrator, so it is chosen per
//! run through a [Dialect] rather than fixed here.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::error::{ReleaseError, Result};

/// Variable carrying the resolved release version.
pub const RELEASE_VERSION: &str = "RELEASE_VERSION";
/// Variable carrying the repository name.
pub const REPO_NAME: &str = "REPO_NAME";
/// Variable carrying the service name.
pub const SERVICE_NAME: &str = "SERVICE_NAME";

/// Line syntax understood by the orchestrator
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `##vso[task.setvariable variable=NAME]VALUE` logging command
    #[default]
    Azure,
    /// `NAME=VALUE`, dotenv style
    Plain,
    /// User supplied line with `{name}` and `{value}` placeholders
    Template,
}

/// Formats and writes pipeline variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineEmitter {
    template: String,
}

impl PipelineEmitter {
    /// Emitter for a built-in dialect or an explicit template
    pub fn new(dialect: Dialect, template: Option<&str>) -> Result<Self> {
        let template = match dialect {
            Dialect::Azure => "##vso[task.setvariable variable={name}]{value}".to_string(),
            Dialect::Plain => "{name}={value}".to_string(),
            Dialect::Template => {
                let template = template.ok_or_else(|| {
                    ReleaseError::config("[pipeline] template is required for the template dialect")
                })?;
                if !template.contains("{value}") {
                    return Err(ReleaseError::config(
                        "[pipeline] template must contain a {value} placeholder",
                    ));
                }
                template.to_string()
            }
        };

        Ok(PipelineEmitter { template })
    }

    /// Emitter from config, with the dialect optionally overridden
    pub fn from_config(config: &PipelineConfig, dialect: Option<Dialect>) -> Result<Self> {
        Self::new(
            dialect.unwrap_or(config.dialect),
            config.template.as_deref(),
        )
    }

    /// Format a single variable line, without newline.
    ///
    /// A line break in `name` or `value` would let the rest of the text be
    /// read as another orchestrator command, so it is an error.
    pub fn format(&self, name: &str, value: &str) -> Result<String> {
        for (what, text) in [("name", name), ("value", value)] {
            if text.contains(['\r', '\n']) {
                return Err(ReleaseError::config(format!(
                    "pipeline variable {} {:?} contains a line break",
                    what, text
                )));
            }
        }

        Ok(self
            .template
            .replace("{name}", name)
            .replace("{value}", value))
    }

    /// Write one variable line to `out`
    pub fn emit<W: Write>(&self, name: &str, value: &str, out: &mut W) -> Result<()> {
        let line = self.format(name, value)?;
        writeln!(out, "{}", line)?;
        out.flush()?;
        tracing::debug!(name, value, "emitted pipeline variable");
        Ok(())
    }
}
