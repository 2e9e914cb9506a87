//! `tether analyze`: one case, one target line.

use std::path::Path;

use tether_metrics::{analyze, AnalysisReport, Registry};

use crate::{BatchConfig, Case, CliError};

/// Parse a target line. Integral floats such as `12.0` are accepted.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
pub fn parse_line(raw: &str) -> Result<i64, CliError> {
    let raw = raw.trim();
    if let Ok(line) = raw.parse::<i64>() {
        return Ok(line);
    }
    match raw.parse::<f64>() {
        Ok(line) if line.is_finite() && line.trunc() == line && line.abs() < 1e15 => {
            Ok(line as i64)
        }
        _ => Err(CliError::Line(raw.to_string())),
    }
}

/// Load `path` and analyze `line` with the standard registry.
pub fn analyze_case(path: &Path, line: i64, config: &BatchConfig) -> Result<AnalysisReport, CliError> {
    let case = Case::load(path)?;
    let report = analyze(&Registry::standard(), case.input(), line, &config.analysis)?;
    Ok(report)
}

/// Print the metric table on stdout and diagnostics on stderr.
pub fn print_report(path: &Path, report: &AnalysisReport) {
    println!("{} line {}", path.display(), report.target_line);
    println!(
        "window: lines {}-{}",
        report.window.start_line, report.window.end_line
    );
    if let Some(scope) = report.scope.scope {
        println!("scope: {scope}");
    }
    println!();
    print!("{}", report.metrics);

    if let Some(degradation) = report.degradation() {
        eprintln!(
            "warning: line {} is outside 1..={}; analyzed the whole file",
            degradation.requested_line, degradation.total_lines
        );
    }
    for fault in &report.faults {
        eprintln!("warning: {fault}");
    }
}
