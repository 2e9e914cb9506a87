//! `tether batch`: every case in a manifest, one CSV row each.

use std::io;
use std::path::Path;

use rayon::prelude::*;
use serde::Deserialize;
use tether_metrics::{analyze, AnalysisReport, Metrics, Registry};
use tracing::{info, warn};

use super::parse_line;
use crate::{BatchConfig, Case, CliError};

/// One manifest row. The line is kept verbatim so failed rows echo it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    pub line: String,
}

/// Read a manifest CSV with an `id,line` header. Other columns are ignored.
pub fn read_manifest(path: &Path) -> Result<Vec<ManifestEntry>, CliError> {
    let manifest_error = |source| CliError::Manifest {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(manifest_error)?;
    reader
        .deserialize()
        .collect::<Result<Vec<_>, _>>()
        .map_err(manifest_error)
}

/// Result row for one manifest entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchRow {
    pub id: String,
    pub line: String,
    /// Every value is [`Metrics::SENTINEL`] when `error` is set.
    pub metrics: Metrics,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOutcome {
    pub columns: Vec<&'static str>,
    /// In manifest order.
    pub rows: Vec<BatchRow>,
}

impl BatchOutcome {
    pub fn failures(&self) -> usize {
        self.rows.iter().filter(|r| r.error.is_some()).count()
    }

    /// Write the wide CSV to `output`, or stdout when absent.
    pub fn write_to(&self, output: Option<&Path>) -> Result<(), CliError> {
        match output {
            Some(path) => self.write_csv(&mut csv::Writer::from_path(path)?)?,
            None => self.write_csv(&mut csv::Writer::from_writer(io::stdout().lock()))?,
        }
        Ok(())
    }

    /// Header `id,line,<metrics...>,error`, then one record per row.
    pub fn write_csv<W: io::Write>(&self, writer: &mut csv::Writer<W>) -> Result<(), csv::Error> {
        let header = ["id", "line"]
            .into_iter()
            .chain(self.columns.iter().copied())
            .chain(["error"]);
        writer.write_record(header)?;

        for row in &self.rows {
            let record = [row.id.clone(), row.line.clone()]
                .into_iter()
                .chain(row.metrics.values().map(|v| v.to_string()))
                .chain([row.error.clone().unwrap_or_default()]);
            writer.write_record(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn analyze_entry(
    entry: &ManifestEntry,
    cases: &Path,
    registry: &Registry,
    config: &BatchConfig,
) -> BatchRow {
    let _span = tracing::debug_span!("case", id = %entry.id).entered();
    let report = parse_line(&entry.line).and_then(|line| -> Result<AnalysisReport, CliError> {
        let case = Case::load(&cases.join(format!("{}.json", entry.id)))?;
        Ok(analyze(registry, case.input(), line, &config.analysis)?)
    });

    let (metrics, error) = match report {
        Ok(report) => (report.metrics, None),
        Err(e) => {
            warn!(id = %entry.id, "case failed: {e}");
            (Metrics::sentinel(registry.columns()), Some(e.to_string()))
        }
    };
    BatchRow {
        id: entry.id.clone(),
        line: entry.line.clone(),
        metrics,
        error,
    }
}

/// Analyze every entry against `<cases>/<id>.json`.
///
/// A failing entry yields a sentinel row and never stops the batch.
#[tracing::instrument(level = "info", skip_all, fields(cases = entries.len()))]
pub fn run_batch(entries: &[ManifestEntry], cases: &Path, config: &BatchConfig) -> BatchOutcome {
    let registry = Registry::standard();
    let analyze_one = |entry: &ManifestEntry| analyze_entry(entry, cases, &registry, config);

    let rows: Vec<BatchRow> = if config.parallel {
        rayon::ThreadPoolBuilder::new()
            .build_scoped(rayon::ThreadBuilder::run, |pool| {
                pool.install(|| entries.par_iter().map(analyze_one).collect::<Vec<_>>())
            })
            .unwrap_or_else(|e| {
                warn!("failed to create thread pool ({e}), running sequentially");
                entries.iter().map(analyze_one).collect::<Vec<_>>()
            })
    } else {
        entries.iter().map(analyze_one).collect::<Vec<_>>()
    };

    let outcome = BatchOutcome {
        columns: registry.columns().to_vec(),
        rows,
    };
    info!(
        rows = outcome.rows.len(),
        failed = outcome.failures(),
        "batch finished"
    );
    outcome
}
