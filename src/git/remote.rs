use crate::domain::tag::TAG_REF_PREFIX;
use crate::domain::Tag;
use crate::error::{ReleaseError, Result};
use crate::git::TagSource;
use crate::process;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upper bound on a single remote tag query.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Lists tags of the default remote with `git ls-remote --tags`.
///
/// The program and arguments can be swapped out, which keeps the output
/// parsing testable against any command that prints ls-remote lines.
#[derive(Debug, Clone)]
pub struct LsRemote {
    program: String,
    args: Vec<String>,
    dir: PathBuf,
    timeout: Duration,
}

impl LsRemote {
    /// Query the remote of the repository at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LsRemote {
            program: "git".to_string(),
            args: vec!["ls-remote".to_string(), "--tags".to_string()],
            dir: dir.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Replace the command that produces the listing
    pub fn with_command<I, S>(mut self, program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.program = program.into();
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TagSource for LsRemote {
    fn list_tags(&self) -> Result<Vec<Tag>> {
        tracing::debug!(
            program = %self.program,
            args = ?self.args,
            dir = %self.dir.display(),
            "listing remote tags"
        );

        let output = process::run_with_timeout(&self.program, &self.args, &self.dir, self.timeout)
            .map_err(|e| {
                ReleaseError::remote(format!("Failed to run '{}': {}", self.program, e))
            })?;

        if output.timed_out() {
            return Err(ReleaseError::remote(format!(
                "Getting tag list from git timed out after {}s",
                self.timeout.as_secs_f32()
            )));
        }

        if !output.success() {
            return Err(ReleaseError::remote(format!(
                "Error getting tag list from git: '{}'",
                output.stderr.trim()
            )));
        }

        let tags = parse_ls_remote(&output.stdout);
        tracing::debug!(count = tags.len(), "remote returned tags");
        Ok(tags)
    }
}

/// Extract tag refs from `git ls-remote` output.
///
/// Lines are `<object id>\t<ref>`; refs outside `refs/tags/` are dropped.
pub fn parse_ls_remote(output: &str) -> Vec<Tag> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .filter(|reference| reference.starts_with(TAG_REF_PREFIX))
        .map(Tag::new)
        .collect()
}
