//! Errors surfaced by the driver commands.

use std::path::PathBuf;

use tether_attrib::AnalysisError;
use thiserror::Error;

use crate::{CaseError, ConfigError};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Case(#[from] CaseError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid target line `{0}`")]
    Line(String),
    #[error("cannot read manifest {}: {source}", path.display())]
    Manifest { path: PathBuf, source: csv::Error },
    #[error("cannot write results: {0}")]
    Output(#[from] csv::Error),
}
