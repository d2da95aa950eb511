//! Typed handles over registered families.
//!
//! Handles are cheap to clone and hold the sample cell directly, so updates
//! never touch the registry or the family map.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{DemoError, Result};

use super::registry::FamilyHandle;
use super::sample::{AtomicF64, HistogramCell, Sample};

fn kind_mismatch(family: &FamilyHandle, expected: &'static str) -> DemoError {
    DemoError::KindMismatch {
        name: family.descriptor().name().to_string(),
        expected,
        actual: family.descriptor().kind().as_str(),
    }
}

/// Settable scalar.
#[derive(Debug, Clone)]
pub struct Gauge {
    cell: Arc<AtomicF64>,
}

impl Gauge {
    pub(crate) fn from_family(family: FamilyHandle, values: &[&str]) -> Result<Self> {
        match family.sample(values)? {
            Sample::Gauge(cell) => Ok(Self { cell }),
            _ => Err(kind_mismatch(&family, "gauge")),
        }
    }

    pub fn set(&self, v: f64) {
        self.cell.set(v);
    }
    pub fn get(&self) -> f64 {
        self.cell.get()
    }
    pub fn inc(&self) {
        self.cell.add(1.0);
    }
}

/// Monotonic scalar.
#[derive(Debug, Clone)]
pub struct Counter {
    family: FamilyHandle,
    cell: Arc<AtomicF64>,
}

impl Counter {
    pub(crate) fn from_family(family: FamilyHandle, values: &[&str]) -> Result<Self> {
        match family.sample(values)? {
            Sample::Counter(cell) => Ok(Self { family, cell }),
            _ => Err(kind_mismatch(&family, "counter")),
        }
    }

    /// Add a non-negative delta. Negative and NaN deltas are rejected and
    /// leave the value untouched.
    pub fn add(&self, delta: f64) -> Result<()> {
        if delta.is_nan() || delta < 0.0 {
            return Err(DemoError::NegativeIncrement {
                name: self.family.descriptor().name().to_string(),
                delta,
            });
        }
        self.cell.add(delta);
        Ok(())
    }

    pub fn inc(&self) {
        self.cell.add(1.0);
    }

    pub fn get(&self) -> f64 {
        self.cell.get()
    }
}

/// Label-partitioned counters.
#[derive(Debug, Clone)]
pub struct CounterVec {
    family: FamilyHandle,
}

impl CounterVec {
    pub(crate) fn from_family(family: FamilyHandle) -> Self {
        Self { family }
    }

    /// Look up or create the counter for `values` (one value per label name).
    pub fn with_labels(&self, values: &[&str]) -> Result<Counter> {
        Counter::from_family(Arc::clone(&self.family), values)
    }
}

/// Cumulative-bucket distribution.
#[derive(Debug, Clone)]
pub struct Histogram {
    cell: Arc<HistogramCell>,
}

impl Histogram {
    pub(crate) fn from_family(family: FamilyHandle, values: &[&str]) -> Result<Self> {
        match family.sample(values)? {
            Sample::Histogram(cell) => Ok(Self { cell }),
            _ => Err(kind_mismatch(&family, "histogram")),
        }
    }

    pub fn observe(&self, v: f64) {
        self.cell.observe(v);
    }

    /// Observe a duration in seconds.
    pub fn observe_duration(&self, d: Duration) {
        self.observe(d.as_secs_f64());
    }
}

/// Label-partitioned histograms sharing one set of bucket bounds.
#[derive(Debug, Clone)]
pub struct HistogramVec {
    family: FamilyHandle,
}

impl HistogramVec {
    pub(crate) fn from_family(family: FamilyHandle) -> Self {
        Self { family }
    }

    pub fn with_labels(&self, values: &[&str]) -> Result<Histogram> {
        Histogram::from_family(Arc::clone(&self.family), values)
    }
}
