//! Command implementations for the `tether` binary.

mod analyze;
mod batch;

pub use analyze::{analyze_case, parse_line, print_report};
pub use batch::{read_manifest, run_batch, BatchOutcome, BatchRow, ManifestEntry};
