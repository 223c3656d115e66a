//! Pull-based observability for the exporter
//!
//! Every metric lives in an explicitly constructed [`Metrics`] registry that is
//! rendered by the `/metrics` endpoint. Nothing is registered in the process-wide
//! default registry.

pub mod metrics;

pub use metrics::{InFlightGuard, Metrics};
