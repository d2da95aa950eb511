//! Prometheus text exposition format (0.0.4).

use std::fmt::Write;

use super::registry::FamilySnapshot;
use super::sample::SampleValue;

/// Content type served alongside [`encode_text`] output.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Shortest round-trip form; non-finite values use the Prometheus spellings.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "+Inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format!("{}", v)
    }
}

/// `{a="1",b="2"}` or an empty string when there are no labels.
fn label_block(pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return String::new();
    }
    let body = pairs
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",");
    format!("{{{}}}", body)
}

/// Render every family in order. Families without samples are left out.
pub fn encode_text(families: &[FamilySnapshot]) -> String {
    let mut out = String::new();
    for f in families.iter().filter(|f| !f.samples.is_empty()) {
        encode_family(f, &mut out);
    }
    out
}

fn encode_family(f: &FamilySnapshot, out: &mut String) {
    let name = f.desc.name();
    let _ = writeln!(out, "# HELP {} {}", name, escape_help(f.desc.help()));
    let _ = writeln!(out, "# TYPE {} {}", name, f.desc.kind().as_str());

    for (values, sample) in &f.samples {
        // const + variable labels, sorted by label name
        let mut pairs: Vec<(&str, String)> = f
            .desc
            .const_labels()
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .chain(
                f.desc
                    .label_names()
                    .iter()
                    .map(String::as_str)
                    .zip(values.iter().cloned()),
            )
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));

        match sample {
            SampleValue::Gauge(v) | SampleValue::Counter(v) => {
                let _ = writeln!(out, "{}{} {}", name, label_block(&pairs), format_float(*v));
            }
            SampleValue::Histogram { buckets, sum, count } => {
                for (le, n) in buckets {
                    pairs.push(("le", format_float(*le)));
                    let _ = writeln!(out, "{}_bucket{} {}", name, label_block(&pairs), n);
                    pairs.pop();
                }
                pairs.push(("le", "+Inf".to_string()));
                let _ = writeln!(out, "{}_bucket{} {}", name, label_block(&pairs), count);
                pairs.pop();

                let labels = label_block(&pairs);
                let _ = writeln!(out, "{}_sum{} {}", name, labels, format_float(*sum));
                let _ = writeln!(out, "{}_count{} {}", name, labels, count);
            }
        }
    }
}
