use crate::error::ErrorClass;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::{debug, warn};

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent<'a> {
    RootScan {
        root: &'a str,
        ids: usize,
    },
    FieldBatch {
        entity: &'a str,
        ids: usize,
        found: usize,
        fields: usize,
    },
    LinkBatch {
        entity: &'a str,
        link: &'a str,
        sources: usize,
        targets: usize,
    },
    RootFailed {
        root: &'a str,
        path: &'a str,
        class: ErrorClass,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink: Send + Sync {
    fn record(&self, event: MetricsEvent<'_>);
}

///
/// NoopSink
///

pub struct NoopSink;

impl MetricsSink for NoopSink {
    fn record(&self, _: MetricsEvent<'_>) {}
}

///
/// TracingSink
/// Default sink; forwards every event to `tracing`.
///

pub struct TracingSink;

impl MetricsSink for TracingSink {
    fn record(&self, event: MetricsEvent<'_>) {
        match event {
            MetricsEvent::RootScan { root, ids } => {
                debug!(root, ids, "root scan");
            }
            MetricsEvent::FieldBatch {
                entity,
                ids,
                found,
                fields,
            } => {
                debug!(entity, ids, found, fields, "field batch");
            }
            MetricsEvent::LinkBatch {
                entity,
                link,
                sources,
                targets,
            } => {
                debug!(entity, link, sources, targets, "link batch");
            }
            MetricsEvent::RootFailed { root, path, class } => {
                warn!(root, path, %class, "root link failed");
            }
        }
    }
}

///
/// MetricsSnapshot
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MetricsSnapshot {
    pub root_scans: u64,
    pub root_failures: u64,
    /// Field batches per entity name.
    pub field_batches: BTreeMap<String, u64>,
    /// Link batches per `entity.link`.
    pub link_batches: BTreeMap<String, u64>,
}

impl MetricsSnapshot {
    #[must_use]
    pub fn field_batches_for(&self, entity: &str) -> u64 {
        self.field_batches.get(entity).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn link_batches_for(&self, entity: &str, link: &str) -> u64 {
        self.link_batches
            .get(&format!("{entity}.{link}"))
            .copied()
            .unwrap_or_default()
    }
}

///
/// CountingSink
/// Process-local counters; cheap enough to keep on in tests and tooling.
///

#[derive(Default)]
pub struct CountingSink {
    state: Mutex<MetricsSnapshot>,
}

impl CountingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.state.lock().clone()
    }

    pub fn reset(&self) {
        *self.state.lock() = MetricsSnapshot::default();
    }
}

impl MetricsSink for CountingSink {
    fn record(&self, event: MetricsEvent<'_>) {
        let mut m = self.state.lock();

        match event {
            MetricsEvent::RootScan { .. } => m.root_scans = m.root_scans.saturating_add(1),
            MetricsEvent::RootFailed { .. } => {
                m.root_failures = m.root_failures.saturating_add(1);
            }
            MetricsEvent::FieldBatch { entity, .. } => {
                let entry = m.field_batches.entry(entity.to_string()).or_default();
                *entry = entry.saturating_add(1);
            }
            MetricsEvent::LinkBatch { entity, link, .. } => {
                let entry = m.link_batches.entry(format!("{entity}.{link}")).or_default();
                *entry = entry.saturating_add(1);
            }
        }
    }
}
