//! In-process metrics: descriptors, registry, instruments and text exposition.
//!
//! Flow: build a [`MetricDescriptor`], register it on a [`Registry`] to get a
//! typed handle, mutate through the handle, then render with
//! [`encode_text`]`(&registry.collect())`.

pub mod descriptor;
pub mod exposition;
pub mod instruments;
pub mod registry;
mod sample;

pub use descriptor::{MetricDescriptor, MetricKind};
pub use exposition::{encode_text, format_float, TEXT_CONTENT_TYPE};
pub use instruments::{Counter, CounterVec, Gauge, Histogram, HistogramVec};
pub use registry::{FamilyHandle, FamilySnapshot, MetricFamily, Registry};
pub use sample::SampleValue;
