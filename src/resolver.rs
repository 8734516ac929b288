//! Next-release-version resolution.
//!
//! Lists every remote tag, keeps the ones that parse as release versions on
//! the target major.minor line and takes the highest patch. The next
//! release is that patch plus one, or `.0` when the line has no release yet.

use std::fmt;

use crate::domain::{ParsedVersion, TargetSelector};
use crate::error::{ReleaseError, Result};
use crate::git::TagSource;

/// Patch value returned when no release exists on the target line.
///
/// Patches are resolved as `i128` so every `u64` patch and the sentinel fit.
pub const NO_PRIOR_RELEASE: i128 = -1;

/// The release to cut for this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDecision {
    pub target: TargetSelector,
    pub patch: u64,
    pub version: semver::Version,
}

impl ReleaseDecision {
    /// Build the decision from the latest existing patch (or the sentinel).
    ///
    /// Fails when the next patch does not fit in a `u64`.
    pub fn from_latest_patch(target: TargetSelector, latest_patch: i128) -> Result<Self> {
        let patch = latest_patch
            .checked_add(1)
            .and_then(|next| u64::try_from(next).ok())
            .ok_or_else(|| {
                ReleaseError::resolve(format!(
                    "no patch after {} on the {} line",
                    latest_patch, target
                ))
            })?;

        Ok(ReleaseDecision {
            target,
            patch,
            version: semver::Version::new(target.major, target.minor, patch),
        })
    }
}

impl fmt::Display for ReleaseDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)
    }
}

/// Highest patch among `versions` on the `target` line, or
/// [`NO_PRIOR_RELEASE`] if none match.
pub fn resolve_latest_patch<'a, I>(target: TargetSelector, versions: I) -> i128
where
    I: IntoIterator<Item = &'a ParsedVersion>,
{
    versions
        .into_iter()
        .filter(|v| target.matches(v))
        .map(|v| i128::from(v.patch))
        .max()
        .unwrap_or(NO_PRIOR_RELEASE)
}

/// Resolve the next release for `target` from the tags of `source`.
///
/// A failing source aborts resolution; malformed tags are skipped.
pub fn next_release<S: TagSource + ?Sized>(
    target: TargetSelector,
    source: &S,
) -> Result<ReleaseDecision> {
    let tags = source.list_tags()?;

    let versions: Vec<ParsedVersion> = tags
        .iter()
        .filter_map(|tag| {
            let parsed = ParsedVersion::from_tag(tag);
            if parsed.is_none() {
                tracing::debug!(tag = %tag, "skipping tag that is not a release version");
            }
            parsed
        })
        .collect();

    let latest_patch = resolve_latest_patch(target, &versions);
    let decision = ReleaseDecision::from_latest_patch(target, latest_patch)?;

    tracing::info!(
        line = %target,
        tags = tags.len(),
        releases = versions.len(),
        latest_patch,
        release = %decision,
        "resolved next release"
    );

    Ok(decision)
}
