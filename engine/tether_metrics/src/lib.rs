//! Tether metrics - change classifiers over an attributed diff
//!
//! A [`Classifier`] reads an [`AnalysisContext`](tether_attrib::AnalysisContext)
//! and writes named counts into a [`MetricSink`]. The [`Registry`] keeps
//! classifiers in a fixed order and owns the column layout of the output
//! row; [`analyze`] runs every registered classifier once per target line.
//!
//! # Adding a classifier
//!
//! 1. Create a new file in `classifiers/`
//! 2. Implement [`Classifier`]
//! 3. Add it to [`Registry::standard`]

mod classifier;
pub mod classifiers;
mod engine;
mod metrics;
mod registry;

pub use classifier::{Classifier, ClassifierFault, MetricSink};
pub use engine::{analyze, run, AnalysisReport};
pub use metrics::Metrics;
pub use registry::{Registry, RegistryError};
