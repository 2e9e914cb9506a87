//! Tether attribution - range, scope and insertion resolution
//!
//! Given two syntax trees, their diff and a target line in the old file,
//! this crate answers three questions:
//!
//! - **Range**: which old-tree nodes lie around the target line
//!   ([`RangeWindow`], [`LineSpan`])
//! - **Scope**: which function-like construct encloses it ([`ScopeContext`])
//! - **Insertion**: where each inserted new-tree node would have appeared in
//!   the old tree ([`AttributionTable`])
//!
//! [`AnalysisContext`] bundles the answers and exposes the range and scope
//! predicates classifiers filter on.

mod config;
mod context;
mod error;
pub mod insertion;
pub mod range;
pub mod scope;
mod stack;

pub use config::{AnalysisConfig, ScopeContainment, Tolerance};
pub use context::{AnalysisContext, AnalysisInput, Version};
pub use error::AnalysisError;
pub use insertion::{Attribution, AttributionStatus, AttributionTable};
pub use range::{Coverage, LineSpan, RangeDegradation, RangeWindow};
pub use scope::ScopeContext;
pub use stack::ensure_sufficient_stack;
