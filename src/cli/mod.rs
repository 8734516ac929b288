//! Command-line workflows, decoupled from argument parsing

pub mod orchestration;

pub use orchestration::{NextVersionArgs, NextVersionResult, ProjectContext};
