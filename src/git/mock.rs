use crate::domain::Tag;
use crate::error::{ReleaseError, Result};
use crate::git::TagSource;

/// Tag source for testing without a git remote
#[derive(Debug, Clone, Default)]
pub struct MockTagSource {
    tags: Vec<Tag>,
    failure: Option<String>,
}

impl MockTagSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source that returns the given tag names in order
    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockTagSource {
            tags: tags.into_iter().map(Tag::new).collect(),
            failure: None,
        }
    }

    /// Create a source whose listing always fails with the given diagnostic
    pub fn failing(diagnostic: impl Into<String>) -> Self {
        MockTagSource {
            tags: Vec::new(),
            failure: Some(diagnostic.into()),
        }
    }

    /// Add a tag
    pub fn add_tag(&mut self, name: impl Into<String>) {
        self.tags.push(Tag::new(name));
    }
}

impl TagSource for MockTagSource {
    fn list_tags(&self) -> Result<Vec<Tag>> {
        match &self.failure {
            Some(diagnostic) => Err(ReleaseError::remote(diagnostic.clone())),
            None => Ok(self.tags.clone()),
        }
    }
}
