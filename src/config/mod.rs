//! Configuration module for the Up Bank exporter.
//!
//! Flags are parsed by [`Cli`]; [`ExporterConfig::load`] reads the key files they
//! point at and validates the result.

mod cli;
mod exporter_config;

pub use cli::Cli;
pub use exporter_config::ExporterConfig;
