//! A reporter for forwarding nested profiler metrics to a [DogStatsD][dsd]-compatible server.
//!
//! [dsd]: https://docs.datadoghq.com/developers/dogstatsd/
//!
//! # Usage
//!
//! Using the reporter is straightforward:
//!
//! ```no_run
//! # use std::collections::HashMap;
//! # use metrics_reporter_dogstatsd::{DogStatsDReporter, MetricTree, MetricValue};
//! // First, create a reporter. By default it will send to `localhost:8125` over UDP, with no
//! // prefix, tags, static metrics, or filtering.
//! let reporter = DogStatsDReporter::new();
//!
//! // Configuration arrives as a raw key/value-list map, typically produced by an external
//! // YAML or properties loader. Calls merge: only the keys present are overwritten.
//! let mut props = HashMap::new();
//! props.insert("datadog.statsd.prefix".to_string(), vec!["jvm".to_string()]);
//! props.insert("datadog.statsd.tags".to_string(), vec!["env:prod;role:worker".to_string()]);
//! reporter.update_arguments(&props).expect("invalid reporter configuration");
//!
//! // On every reporting cycle, hand over the nested metric tree. Each leaf numeric value is
//! // emitted as a gauge under its dotted name, e.g. `heap.used`.
//! let mut heap = MetricTree::new();
//! heap.insert("used".to_string(), MetricValue::Number(100.0));
//! let mut metrics = MetricTree::new();
//! metrics.insert("heap".to_string(), MetricValue::Nested(heap));
//! reporter.report("cpuAndMemory", &metrics).expect("malformed static metric");
//!
//! // Tear down the connection on shutdown. Reporting again after this reconnects.
//! reporter.close();
//! ```
//!
//! # Behavior
//!
//! This reporter makes some explicit trade-offs to accomplish its task:
//!
//! - Delivery is best-effort: samples are sent over UDP from a non-blocking socket, and a
//!   failed send is logged and dropped. Reporting can never block or crash the profiled
//!   application, and no retries are attempted.
//! - Misconfiguration is loud: a malformed port value or static metric entry fails the
//!   triggering call instead of silently dropping metrics.
//! - The filter set, when non-empty, is the authoritative allow-list. It is matched against
//!   every dequeued name during flattening, including synthetic dotted names, not just
//!   top-level keys.

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![deny(missing_docs)]

mod client;

mod config;
pub use self::config::{ConfigError, ReporterConfig};

mod flatten;
pub use self::flatten::{MetricTree, MetricValue};

mod reporter;
pub use self::reporter::DogStatsDReporter;
