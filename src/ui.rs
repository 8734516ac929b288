//! Human-readable status output.
//!
//! Everything here goes to stderr: stdout is reserved for the pipeline
//! variable lines the orchestrator parses.

use console::style;

use crate::coverage::CoverageReport;

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Show the required and measured coverage
pub fn display_coverage(report: &CoverageReport) {
    display_status(&format!(
        "COVERAGE REQUIRED: {:.2}%",
        report.minimum * 100.0
    ));
    display_success(&format!(
        "coverage {:.2}% meets the threshold",
        report.line_rate * 100.0
    ));
}
