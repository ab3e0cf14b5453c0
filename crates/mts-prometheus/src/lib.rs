//! Prometheus export of simulation results.
//!
//! [`PrometheusMetrics`] accumulates [`mts_core::RunReport`]s into a private registry; every series
//! carries a `model` label (`smt`, `imt`, `bmt`).
//!
//! ## Example
//! ```rust
//! use mts_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! // metrics.observe(&report);
//! let text = metrics.render()?;
//! assert!(!text.contains("model="));
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `mts_runs_total{model}` - Counter
//! - `mts_cycles_total{model}` - Counter
//! - `mts_instructions_total{model}` - Counter
//! - `mts_bubble_cycles_total{model}` - Counter
//! - `mts_task_failures_total{model}` - Counter
//! - `mts_ipc{model}` - Gauge, IPC of the latest run
//!
//! ## HTTP Server
//! This crate does NOT serve `/metrics`; the rendered text is meant to be printed or handed to
//! whatever server the application already runs.

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
