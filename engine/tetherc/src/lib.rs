//! Tether driver library
//!
//! Loads pre-computed diff results from JSON case files, runs the standard
//! classifier registry on them and writes one wide CSV row per case. The
//! `tether` binary is a thin argument parser over this crate.

pub mod case;
pub mod commands;
mod config;
mod error;
mod tracing_setup;

pub use case::{Case, CaseError};
pub use config::{BatchConfig, ConfigError};
pub use error::CliError;
pub use tracing_setup::init_tracing;
