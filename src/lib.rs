pub mod cli;
pub mod config;
pub mod coverage;
pub mod domain;
pub mod error;
pub mod git;
pub mod language;
pub mod logging;
pub mod pipeline;
pub mod process;
pub mod protodoc;
pub mod resolver;
pub mod ui;

pub use error::{ReleaseError, Result};
