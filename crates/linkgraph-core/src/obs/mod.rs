//! Observability boundary.
//!
//! Resolution logic reports what it did through `MetricsEvent`s handed to a
//! `MetricsSink`; it never logs or counts directly.

mod sink;

pub use sink::{CountingSink, MetricsEvent, MetricsSink, MetricsSnapshot, NoopSink, TracingSink};
