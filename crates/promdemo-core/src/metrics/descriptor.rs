//! Static metric metadata.

use crate::error::{DemoError, Result};

/// Metric type, with histogram bucket bounds attached.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricKind {
    Gauge,
    Counter,
    /// Upper bounds, strictly increasing. The +Inf bucket is implicit.
    Histogram(Vec<f64>),
}

impl MetricKind {
    /// Name used on the `# TYPE` line.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
            MetricKind::Histogram(_) => "histogram",
        }
    }

    pub fn buckets(&self) -> &[f64] {
        match self {
            MetricKind::Histogram(b) => b,
            _ => &[],
        }
    }
}

/// Immutable description of a metric family.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDescriptor {
    name: String,
    help: String,
    label_names: Vec<String>,
    const_labels: Vec<(String, String)>,
    kind: MetricKind,
}

impl MetricDescriptor {
    pub fn new(name: impl Into<String>, help: impl Into<String>, kind: MetricKind) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            label_names: Vec::new(),
            const_labels: Vec::new(),
            kind,
        }
    }

    pub fn gauge(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self::new(name, help, MetricKind::Gauge)
    }

    pub fn counter(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self::new(name, help, MetricKind::Counter)
    }

    pub fn histogram(name: impl Into<String>, help: impl Into<String>, buckets: &[f64]) -> Self {
        Self::new(name, help, MetricKind::Histogram(buckets.to_vec()))
    }

    /// Variable label names, in the order label values are supplied.
    pub fn with_labels(mut self, names: &[&str]) -> Self {
        self.label_names = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Add a label whose value is fixed for every sample of the family.
    pub fn with_const_label(mut self, name: &str, value: &str) -> Self {
        self.const_labels.push((name.to_string(), value.to_string()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn help(&self) -> &str {
        &self.help
    }
    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }
    pub fn const_labels(&self) -> &[(String, String)] {
        &self.const_labels
    }
    pub fn kind(&self) -> &MetricKind {
        &self.kind
    }

    /// Checked once at registration.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_metric_name(&self.name) {
            return Err(invalid(format!("bad metric name {:?}", self.name)));
        }

        let mut seen: Vec<&str> = Vec::new();
        let all = self
            .label_names
            .iter()
            .map(String::as_str)
            .chain(self.const_labels.iter().map(|(k, _)| k.as_str()));
        for label in all {
            if !is_valid_label_name(label) {
                return Err(invalid(format!("{}: bad label name {:?}", self.name, label)));
            }
            if seen.contains(&label) {
                return Err(invalid(format!("{}: duplicate label {:?}", self.name, label)));
            }
            seen.push(label);
        }

        if let MetricKind::Histogram(buckets) = &self.kind {
            if seen.contains(&"le") {
                return Err(invalid(format!("{}: \"le\" is reserved for histograms", self.name)));
            }
            if buckets.is_empty() {
                return Err(invalid(format!("{}: histogram needs at least one bucket", self.name)));
            }
            if buckets.iter().any(|b| !b.is_finite()) {
                return Err(invalid(format!("{}: bucket bounds must be finite", self.name)));
            }
            if buckets.windows(2).any(|w| w[0] >= w[1]) {
                return Err(invalid(format!(
                    "{}: bucket bounds must be strictly increasing",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

fn invalid(msg: String) -> DemoError {
    DemoError::InvalidDescriptor(msg)
}

// [a-zA-Z_:][a-zA-Z0-9_:]*
fn is_valid_metric_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

// [a-zA-Z_][a-zA-Z0-9_]*, "__" prefix reserved
fn is_valid_label_name(s: &str) -> bool {
    if s.starts_with("__") {
        return false;
    }
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
