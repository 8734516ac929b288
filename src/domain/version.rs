use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use super::Tag;

/// Release grammar: dotted numeric components, then an optional
/// pre-release/build suffix that must not start with a dot.
fn release_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<release>\d+(?:\.\d+)*)(?P<suffix>[-+A-Za-z][0-9A-Za-z.+\-]*)?$")
            .expect("release grammar is a valid regex")
    })
}

/// A version parsed from a tag.
///
/// Only major, minor and patch take part in comparisons made by the
/// resolver; the suffix is kept for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub suffix: Option<String>,
}

impl ParsedVersion {
    /// Create a version without suffix
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        ParsedVersion {
            major,
            minor,
            patch,
            suffix: None,
        }
    }

    /// Parse the version text of a tag (prefix already stripped).
    ///
    /// Returns `None` when the text does not follow the release grammar or
    /// has fewer than three numeric components. Components past the third
    /// are ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = release_regex().captures(text)?;

        let mut components = caps["release"].split('.').map(|c| c.parse::<u64>());
        let major = components.next()?.ok()?;
        let minor = components.next()?.ok()?;
        let patch = components.next()?.ok()?;
        // A trailing component that overflows still makes the tag malformed.
        if components.any(|c| c.is_err()) {
            return None;
        }

        Some(ParsedVersion {
            major,
            minor,
            patch,
            suffix: caps.name("suffix").map(|m| m.as_str().to_string()),
        })
    }

    /// Parse a raw tag, stripping its ref decoration first.
    ///
    /// Tags without the `v` prefix are not releases and give `None`.
    pub fn from_tag(tag: &Tag) -> Option<Self> {
        tag.version_part().and_then(Self::parse)
    }
}

impl fmt::Display for ParsedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(suffix) = &self.suffix {
            f.write_str(suffix)?;
        }
        Ok(())
    }
}

/// The major.minor line a release is cut from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSelector {
    pub major: u64,
    pub minor: u64,
}

impl TargetSelector {
    pub fn new(major: u64, minor: u64) -> Self {
        TargetSelector { major, minor }
    }

    /// Whether a parsed version belongs to this major.minor line
    pub fn matches(&self, version: &ParsedVersion) -> bool {
        version.major == self.major && version.minor == self.minor
    }
}

impl FromStr for TargetSelector {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            ReleaseError::config(format!(
                "version target '{}' is not in major.minor format",
                s
            ))
        };

        let (major, minor) = s.trim().split_once('.').ok_or_else(invalid)?;
        let major = major.parse::<u64>().map_err(|_| invalid())?;
        let minor = minor.parse::<u64>().map_err(|_| invalid())?;

        Ok(TargetSelector { major, minor })
    }
}

impl fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
