//! Metric registry.
//!
//! The registry is constructed explicitly and shared by `Arc`; there is no
//! process-global instance. Families are kept in a `BTreeMap` so collection
//! order is the lexical order of metric names. Label tuples inside a family
//! are keyed by value in a `DashMap`.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use dashmap::DashMap;

use crate::error::{DemoError, Result};

use super::descriptor::MetricDescriptor;
use super::instruments::{Counter, CounterVec, Gauge, Histogram, HistogramVec};
use super::sample::{Sample, SampleValue};

/// Shared handle to a registered family.
pub type FamilyHandle = Arc<MetricFamily>;

/// One descriptor plus the samples of every label tuple seen so far.
#[derive(Debug)]
pub struct MetricFamily {
    desc: MetricDescriptor,
    samples: DashMap<Vec<String>, Sample>,
}

impl MetricFamily {
    fn new(desc: MetricDescriptor) -> Self {
        let samples = DashMap::new();
        if desc.label_names().is_empty() {
            samples.insert(Vec::new(), Sample::for_kind(desc.kind()));
        }
        Self { desc, samples }
    }

    pub fn descriptor(&self) -> &MetricDescriptor {
        &self.desc
    }

    /// Look up or lazily create the sample for `values`.
    pub(crate) fn sample(&self, values: &[&str]) -> Result<Sample> {
        let expected = self.desc.label_names().len();
        if values.len() != expected {
            return Err(DemoError::LabelCardinality {
                name: self.desc.name().to_string(),
                expected,
                got: values.len(),
            });
        }

        let key: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        if let Some(s) = self.samples.get(&key) {
            return Ok(s.value().clone());
        }
        let s = self
            .samples
            .entry(key)
            .or_insert_with(|| Sample::for_kind(self.desc.kind()));
        Ok(s.value().clone())
    }

    /// Consistent per-sample snapshot of the family, samples sorted by label values.
    pub fn snapshot(&self) -> FamilySnapshot {
        let mut samples: Vec<(Vec<String>, SampleValue)> = self
            .samples
            .iter()
            .map(|r| (r.key().clone(), r.value().snapshot()))
            .collect();
        samples.sort_by(|a, b| a.0.cmp(&b.0));
        FamilySnapshot {
            desc: self.desc.clone(),
            samples,
        }
    }
}

/// Collected state of one family.
#[derive(Debug, Clone)]
pub struct FamilySnapshot {
    pub desc: MetricDescriptor,
    /// `(label values in descriptor order, value)`.
    pub samples: Vec<(Vec<String>, SampleValue)>,
}

#[derive(Debug, Default)]
pub struct Registry {
    families: RwLock<BTreeMap<String, FamilyHandle>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a family. Names are unique per registry.
    pub fn register(&self, desc: MetricDescriptor) -> Result<FamilyHandle> {
        desc.validate()?;

        let mut g = self
            .families
            .write()
            .map_err(|_| DemoError::Internal("registry lock poisoned".into()))?;
        if g.contains_key(desc.name()) {
            return Err(DemoError::DuplicateMetricName(desc.name().to_string()));
        }

        let name = desc.name().to_string();
        let family = Arc::new(MetricFamily::new(desc));
        g.insert(name.clone(), Arc::clone(&family));
        tracing::debug!(metric = %name, kind = family.desc.kind().as_str(), "metric registered");
        Ok(family)
    }

    pub fn register_gauge(&self, desc: MetricDescriptor) -> Result<Gauge> {
        expect_kind(&desc, "gauge")?;
        expect_unlabeled(&desc)?;
        Gauge::from_family(self.register(desc)?, &[])
    }

    pub fn register_counter(&self, desc: MetricDescriptor) -> Result<Counter> {
        expect_kind(&desc, "counter")?;
        expect_unlabeled(&desc)?;
        Counter::from_family(self.register(desc)?, &[])
    }

    pub fn register_counter_vec(&self, desc: MetricDescriptor) -> Result<CounterVec> {
        expect_kind(&desc, "counter")?;
        Ok(CounterVec::from_family(self.register(desc)?))
    }

    pub fn register_histogram(&self, desc: MetricDescriptor) -> Result<Histogram> {
        expect_kind(&desc, "histogram")?;
        expect_unlabeled(&desc)?;
        Histogram::from_family(self.register(desc)?, &[])
    }

    pub fn register_histogram_vec(&self, desc: MetricDescriptor) -> Result<HistogramVec> {
        expect_kind(&desc, "histogram")?;
        Ok(HistogramVec::from_family(self.register(desc)?))
    }

    /// Snapshot every family, ordered by name.
    pub fn collect(&self) -> Vec<FamilySnapshot> {
        // Clone the handles first so no sample is read under the registry lock.
        let families: Vec<FamilyHandle> = match self.families.read() {
            Ok(g) => g.values().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().values().cloned().collect(),
        };
        families.iter().map(|f| f.snapshot()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        match self.families.read() {
            Ok(g) => g.contains_key(name),
            Err(poisoned) => poisoned.into_inner().contains_key(name),
        }
    }

    pub fn len(&self) -> usize {
        match self.families.read() {
            Ok(g) => g.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn expect_kind(desc: &MetricDescriptor, expected: &'static str) -> Result<()> {
    let actual = desc.kind().as_str();
    if actual != expected {
        return Err(DemoError::KindMismatch {
            name: desc.name().to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn expect_unlabeled(desc: &MetricDescriptor) -> Result<()> {
    if !desc.label_names().is_empty() {
        return Err(DemoError::LabelCardinality {
            name: desc.name().to_string(),
            expected: 0,
            got: desc.label_names().len(),
        });
    }
    Ok(())
}

