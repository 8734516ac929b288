//! Domain logic - pure version rules independent of git and the filesystem

pub mod tag;
pub mod version;

pub use tag::Tag;
pub use version::{ParsedVersion, TargetSelector};
