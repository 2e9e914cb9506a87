//! Errors for malformed analysis input.

use thiserror::Error;
use tether_ir::{MappingError, ScriptError};

/// Precondition violations. The analysis fails fast on any of these.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("invalid correspondence: {0}")]
    Mapping(#[from] MappingError),
    #[error("invalid edit script: {0}")]
    Script(#[from] ScriptError),
    #[error("change sets do not match trees of {old_nodes} old and {new_nodes} new nodes")]
    ChangeSetsMismatch { old_nodes: usize, new_nodes: usize },
}
