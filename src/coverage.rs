//! Test coverage threshold checks against Cobertura XML reports.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReleaseError, Result};

/// Which tool produced the report, and so where the line rate lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CoverageFormat {
    /// coverage.py: `line-rate` of the `<package name=".">` element
    Python,
    /// cargo-tarpaulin / grcov: `line-rate` of the root `<coverage>` element
    Rust,
}

impl CoverageFormat {
    /// Report location relative to the project directory
    pub fn default_report_path(&self) -> PathBuf {
        let reports = Path::new("zdevelop").join("tests").join("_reports");
        match self {
            CoverageFormat::Python => reports.join("coverage.xml"),
            CoverageFormat::Rust => reports.join("cobertura.xml"),
        }
    }
}

/// Line coverage measured against the required minimum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageReport {
    pub line_rate: f64,
    pub minimum: f64,
}

impl CoverageReport {
    pub fn passed(&self) -> bool {
        self.line_rate >= self.minimum
    }
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "current coverage is {:.2}%, required {:.2}%",
            self.line_rate * 100.0,
            self.minimum * 100.0
        )
    }
}

/// Read the line rate out of a Cobertura XML document
pub fn parse_line_rate(xml: &str, format: CoverageFormat) -> Result<f64> {
    // Cobertura reports usually carry a DOCTYPE line.
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let doc = roxmltree::Document::parse_with_options(xml, options)
        .map_err(|e| ReleaseError::coverage(format!("invalid coverage XML: {}", e)))?;

    let node = match format {
        CoverageFormat::Rust => doc.root_element(),
        CoverageFormat::Python => doc
            .descendants()
            .find(|n| n.has_tag_name("package") && n.attribute("name") == Some("."))
            .ok_or_else(|| ReleaseError::coverage("no <package name=\".\"> element in report"))?,
    };

    let raw = node.attribute("line-rate").ok_or_else(|| {
        ReleaseError::coverage(format!(
            "<{}> element has no line-rate attribute",
            node.tag_name().name()
        ))
    })?;

    let rate = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ReleaseError::coverage(format!("line-rate '{}' is not a number", raw)))?;

    if !rate.is_finite() {
        return Err(ReleaseError::coverage(format!("line-rate '{}' is not finite", raw)));
    }
    Ok(rate)
}

/// Check the report at `report_path` against `minimum`.
///
/// A report below the minimum is an error; the returned report always passed.
pub fn check_coverage(
    report_path: &Path,
    format: CoverageFormat,
    minimum: f64,
) -> Result<CoverageReport> {
    tracing::debug!(path = %report_path.display(), ?format, minimum, "checking coverage");

    let xml = fs::read_to_string(report_path).map_err(|e| {
        ReleaseError::coverage(format!("Cannot read '{}': {}", report_path.display(), e))
    })?;

    let report = CoverageReport {
        line_rate: parse_line_rate(&xml, format)?,
        minimum,
    };

    if !report.passed() {
        return Err(ReleaseError::coverage(format!(
            "test coverage must reach {:.2}% to publish, {}",
            minimum * 100.0,
            report
        )));
    }

    tracing::info!(line_rate = report.line_rate, minimum, "coverage threshold met");
    Ok(report)
}
