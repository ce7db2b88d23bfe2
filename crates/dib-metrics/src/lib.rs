//! Ambient metrics scaffolding shared by the relay core and service layer.
//!
//! This crate wires no exporter (no Prometheus endpoint, no push gateway) — that packaging
//! concern is explicitly out of scope. It only supplies the instrumentation points a concrete
//! deployment hangs an exporter off of: a pair of macros that wrap a fallible call in
//! success/error counters plus a duration histogram, and a [`MetricsReporter`] trait for types
//! that expose periodically-sampled gauges (e.g. current register size) rather than per-call
//! counters.

mod macros;

mod reporter;
pub use reporter::MetricsReporter;
