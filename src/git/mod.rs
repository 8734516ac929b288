//! Tag listing abstraction layer
//!
//! The resolver never talks to git directly. It depends on the [TagSource]
//! trait, which has two implementations:
//!
//! - [remote::LsRemote]: the live strategy, shelling out to `git ls-remote --tags`
//! - [mock::MockTagSource]: a fixed in-memory list for testing
//!
//! [repository] holds the few operations that read the local repository
//! through `git2` instead of the remote.
//!
//! ```rust
//! # use ci_release::git::{MockTagSource, TagSource};
//! let source = MockTagSource::with_tags(["v1.0.0", "v1.0.1"]);
//! let tags = source.list_tags().unwrap();
//! assert_eq!(tags.len(), 2);
//! ```

pub mod mock;
pub mod remote;
pub mod repository;

pub use mock::MockTagSource;
pub use remote::LsRemote;
pub use repository::origin_repo_name;

use crate::domain::Tag;
use crate::error::Result;

/// Source of raw release tags.
///
/// Ordering of the returned tags is unspecified; callers scan all of them.
///
/// ## Error Handling
///
/// Implementations must surface any failure to enumerate tags as
/// [crate::error::ReleaseError::Remote] carrying the diagnostic text of the
/// underlying tool. Callers abort on it; there is no partial result.
pub trait TagSource: Send + Sync {
    /// List every tag known to the source
    fn list_tags(&self) -> Result<Vec<Tag>>;
}

impl<T: TagSource + ?Sized> TagSource for Box<T> {
    fn list_tags(&self) -> Result<Vec<Tag>> {
        (**self).list_tags()
    }
}
