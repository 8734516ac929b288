/// Ref namespace that `git ls-remote --tags` prefixes every tag with.
pub const TAG_REF_PREFIX: &str = "refs/tags/";

/// Suffix git appends to the peeled entry of an annotated tag.
const PEELED_SUFFIX: &str = "^{}";

/// Represents a raw tag identifier as returned by the remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    /// Create a new tag from a string
    pub fn new(name: impl Into<String>) -> Self {
        Tag { name: name.into() }
    }

    /// Extract the version text from the tag.
    ///
    /// Strips the `refs/tags/` ref path and the `^{}` peel marker, then
    /// requires a single leading `v`/`V`. Release tags always carry it, so
    /// anything else is `None`. The remaining text is not validated.
    ///
    /// ```
    /// # use ci_release::domain::Tag;
    /// assert_eq!(Tag::new("refs/tags/v1.4.2").version_part(), Some("1.4.2"));
    /// assert_eq!(Tag::new("refs/tags/v1.4.2^{}").version_part(), Some("1.4.2"));
    /// assert_eq!(Tag::new("V0.1.0").version_part(), Some("0.1.0"));
    /// assert_eq!(Tag::new("refs/tags/1.4.9").version_part(), None);
    /// ```
    pub fn version_part(&self) -> Option<&str> {
        let name = self.name.trim();
        let name = name.strip_prefix(TAG_REF_PREFIX).unwrap_or(name);
        let name = name.strip_suffix(PEELED_SUFFIX).unwrap_or(name);
        name.strip_prefix(['v', 'V'])
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_new() {
        let tag = Tag::new("v1.2.3");
        assert_eq!(tag.name, "v1.2.3");
    }

    #[test]
    fn test_tag_version_part() {
        assert_eq!(Tag::new("v1.2.3").version_part(), Some("1.2.3"));
        assert_eq!(Tag::new("V1.2.3").version_part(), Some("1.2.3"));
    }

    #[test]
    fn test_tag_without_v_has_no_version_part() {
        assert_eq!(Tag::new("1.2.3").version_part(), None);
        assert_eq!(Tag::new("refs/tags/1.4.9").version_part(), None);
        assert_eq!(Tag::new("refs/tags/1.4.9^{}").version_part(), None);
    }

    #[test]
    fn test_tag_version_part_strips_ref_path() {
        assert_eq!(Tag::new("refs/tags/v1.4.2").version_part(), Some("1.4.2"));
    }

    #[test]
    fn test_tag_version_part_strips_peel_marker() {
        assert_eq!(Tag::new("refs/tags/v2.0.0^{}").version_part(), Some("2.0.0"));
    }

    #[test]
    fn test_tag_version_part_strips_only_one_v() {
        assert_eq!(Tag::new("vv1.0.0").version_part(), Some("v1.0.0"));
    }

    #[test]
    fn test_tag_version_part_rejects_other_text() {
        assert_eq!(Tag::new("release-1.2.3").version_part(), None);
    }
}
