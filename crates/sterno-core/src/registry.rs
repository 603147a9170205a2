//! Concurrently readable registry of generated metrics.
//!
//! Each registered metric owns one value cell: an `AtomicU64` holding the bit
//! pattern of an `f64`. The only writer is the [`MetricHandle`] returned by
//! [`Registry::register`]; any number of snapshot readers may run alongside
//! it. Cells are indexed by a sharded `DashMap`, so there is no global lock
//! across metrics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{Result, SternoError};
use crate::metric::{MetricId, MetricKind};

struct MetricCell {
    fq_name: String,
    kind: MetricKind,
    help: Option<String>,
    bits: AtomicU64,
}

impl MetricCell {
    fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }
}

/// Exclusive write handle to one registered metric.
///
/// Not `Clone`: the holder is the sole writer of the cell.
pub struct MetricHandle {
    id: MetricId,
    cell: Arc<MetricCell>,
}

impl MetricHandle {
    pub fn id(&self) -> &MetricId {
        &self.id
    }

    pub fn fq_name(&self) -> &str {
        &self.cell.fq_name
    }

    /// Store a new value.
    pub fn set(&self, value: f64) {
        self.cell.bits.store(value.to_bits(), Ordering::Release);
    }

    /// Current value.
    pub fn get(&self) -> f64 {
        self.cell.load()
    }
}

/// One metric as seen by an exporter.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub fq_name: String,
    pub kind: MetricKind,
    pub help: Option<String>,
    pub value: f64,
}

/// Registry:
/// - `MetricId -> cell`
/// - registration fails on duplicate identity
#[derive(Default)]
pub struct Registry {
    cells: DashMap<MetricId, Arc<MetricCell>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            cells: DashMap::new(),
        }
    }

    /// Register a metric with an initial value of zero.
    ///
    /// Fails with `DuplicateMetric` if `id` is already present; the existing
    /// entry is left untouched.
    pub fn register(
        &self,
        id: MetricId,
        kind: MetricKind,
        help: Option<String>,
    ) -> Result<MetricHandle> {
        match self.cells.entry(id) {
            Entry::Occupied(e) => Err(SternoError::DuplicateMetric(e.key().fq_name())),
            Entry::Vacant(e) => {
                let cell = Arc::new(MetricCell {
                    fq_name: e.key().fq_name(),
                    kind,
                    help,
                    bits: AtomicU64::new(0f64.to_bits()),
                });
                let id = e.key().clone();
                e.insert(Arc::clone(&cell));
                Ok(MetricHandle { id, cell })
            }
        }
    }

    /// Write through a handle. Equivalent to [`MetricHandle::set`].
    pub fn set_value(&self, handle: &MetricHandle, value: f64) {
        handle.set(value);
    }

    /// Current value of one metric.
    pub fn get(&self, id: &MetricId) -> Option<f64> {
        self.cells.get(id).map(|c| c.value().load())
    }

    /// Current value looked up by fully-qualified name.
    ///
    /// Linear scan over all cells; a convenience for tests and debugging.
    /// Exporters should use [`Registry::snapshot`].
    pub fn get_by_name(&self, fq_name: &str) -> Option<f64> {
        self.cells
            .iter()
            .find(|c| c.value().fq_name == fq_name)
            .map(|c| c.value().load())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All metrics, ordered by fully-qualified name.
    pub fn snapshot(&self) -> Vec<MetricSample> {
        let mut out: Vec<MetricSample> = self
            .cells
            .iter()
            .map(|r| {
                let cell = r.value();
                MetricSample {
                    fq_name: cell.fq_name.clone(),
                    kind: cell.kind,
                    help: cell.help.clone(),
                    value: cell.load(),
                }
            })
            .collect();
        out.sort_by(|a, b| a.fq_name.cmp(&b.fq_name));
        out
    }
}
