use std::collections::HashSet;

use indexmap::IndexMap;

/// A nested tree of named metrics, as handed over by the profiling subsystem.
///
/// Iteration order is insertion order, which is the order the flattener walks top-level
/// entries and descends into nested values. The tree is borrowed for the duration of a
/// reporting call and never retained.
pub type MetricTree = IndexMap<String, MetricValue>;

/// A single value in a [`MetricTree`].
#[derive(Clone, Debug, PartialEq)]
pub enum MetricValue {
    /// A numeric leaf, reported as a gauge.
    Number(f64),

    /// A textual leaf, such as a process UUID. Never reported.
    Text(String),

    /// A nested tree of further metrics.
    Nested(MetricTree),
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Number(value as f64)
    }
}

impl From<u64> for MetricValue {
    fn from(value: u64) -> Self {
        MetricValue::Number(value as f64)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Text(value)
    }
}

impl From<MetricTree> for MetricValue {
    fn from(value: MetricTree) -> Self {
        MetricValue::Nested(value)
    }
}

/// Flattens a metric tree into `(dotted-name, value)` pairs.
///
/// Names are built by joining nested keys with `.` in root-to-leaf order. When `filters` is
/// non-empty it acts as an allow-list: every entry taken off the work stack is checked against
/// it by its full dotted name, and entries not in the set are dropped without descending.
/// Numeric children of a surviving nested entry are recorded directly and bypass that check;
/// non-numeric children go back on the stack under their dotted name and are re-checked when
/// popped. The order of the returned pairs is unspecified.
pub(crate) fn flatten(metrics: &MetricTree, filters: &HashSet<String>) -> Vec<(String, f64)> {
    let mut flat = Vec::new();
    let mut stack: Vec<(String, &MetricValue)> =
        metrics.iter().rev().map(|(key, value)| (key.clone(), value)).collect();

    while let Some((name, value)) = stack.pop() {
        if !filters.is_empty() && !filters.contains(&name) {
            continue;
        }

        match value {
            MetricValue::Number(value) => flat.push((name, *value)),
            MetricValue::Nested(children) => {
                for (child_key, child) in children {
                    let child_name = format!("{name}.{child_key}");
                    if let MetricValue::Number(value) = child {
                        flat.push((child_name, *value));
                    } else {
                        stack.push((child_name, child));
                    }
                }
            }
            MetricValue::Text(_) => {}
        }
    }

    flat
}
