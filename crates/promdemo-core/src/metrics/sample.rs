//! Mutable per-series state.
//!
//! Gauges and counters are a single `f64` stored as bits in an `AtomicU64`.
//! A histogram sample keeps its buckets, sum and count behind one mutex so a
//! reader never sees an observation applied to some fields but not others.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::descriptor::MetricKind;

/// Lock-free `f64` cell.
#[derive(Debug)]
pub(crate) struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    pub(crate) fn new(v: f64) -> Self {
        Self { bits: AtomicU64::new(v.to_bits()) }
    }

    pub(crate) fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, v: f64) {
        self.bits.store(v.to_bits(), Ordering::Release);
    }

    pub(crate) fn add(&self, delta: f64) {
        let mut cur = self.bits.load(Ordering::Acquire);
        loop {
            let next = (f64::from_bits(cur) + delta).to_bits();
            match self
                .bits
                .compare_exchange_weak(cur, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return,
                Err(actual) => cur = actual,
            }
        }
    }
}

#[derive(Debug)]
struct HistogramState {
    // cumulative: buckets[i] counts observations <= bounds[i]
    buckets: Vec<u64>,
    sum: f64,
    count: u64,
}

#[derive(Debug)]
pub(crate) struct HistogramCell {
    bounds: Vec<f64>,
    state: Mutex<HistogramState>,
}

impl HistogramCell {
    fn new(bounds: &[f64]) -> Self {
        Self {
            bounds: bounds.to_vec(),
            state: Mutex::new(HistogramState {
                buckets: vec![0; bounds.len()],
                sum: 0.0,
                count: 0,
            }),
        }
    }

    pub(crate) fn observe(&self, v: f64) {
        let mut g = match self.state.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        for (i, &b) in self.bounds.iter().enumerate() {
            if v <= b {
                g.buckets[i] += 1;
            }
        }
        g.sum += v;
        g.count += 1;
    }

    fn snapshot(&self) -> SampleValue {
        let g = match self.state.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        SampleValue::Histogram {
            buckets: self.bounds.iter().copied().zip(g.buckets.iter().copied()).collect(),
            sum: g.sum,
            count: g.count,
        }
    }
}

/// State of one series inside a family. Cloning shares the cell.
#[derive(Debug, Clone)]
pub(crate) enum Sample {
    Gauge(Arc<AtomicF64>),
    Counter(Arc<AtomicF64>),
    Histogram(Arc<HistogramCell>),
}

impl Sample {
    pub(crate) fn for_kind(kind: &MetricKind) -> Self {
        match kind {
            MetricKind::Gauge => Sample::Gauge(Arc::new(AtomicF64::new(0.0))),
            MetricKind::Counter => Sample::Counter(Arc::new(AtomicF64::new(0.0))),
            MetricKind::Histogram(bounds) => {
                Sample::Histogram(Arc::new(HistogramCell::new(bounds)))
            }
        }
    }

    pub(crate) fn snapshot(&self) -> SampleValue {
        match self {
            Sample::Gauge(v) => SampleValue::Gauge(v.get()),
            Sample::Counter(v) => SampleValue::Counter(v.get()),
            Sample::Histogram(h) => h.snapshot(),
        }
    }
}

/// Point-in-time value of a sample, as handed to the encoder.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    Gauge(f64),
    Counter(f64),
    Histogram {
        /// `(upper bound, cumulative count)` pairs, +Inf excluded.
        buckets: Vec<(f64, u64)>,
        sum: f64,
        count: u64,
    },
}
