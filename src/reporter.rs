use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, error};

use crate::{
    client::StatsdClient,
    config::{self, ConfigError, ReporterConfig},
    flatten::{self, MetricTree},
};

/// Forwards nested profiler metrics to a DogStatsD-compatible server as gauges.
///
/// The reporter is driven entirely by its caller: some external scheduler invokes
/// [`report`][Self::report] once per reporting cycle with a fresh [`MetricTree`], and the
/// reporter flattens it, applies the configured allow-list, appends any static metrics, and
/// emits one gauge per resulting pair. Delivery is best-effort over UDP and a send failure is
/// never surfaced.
///
/// The connection to the server is established lazily on the first report, using whatever
/// prefix/hostname/port/tags are configured at that moment, and is reused until
/// [`close`][Self::close].
pub struct DogStatsDReporter {
    config: RwLock<ReporterConfig>,
    client: Mutex<Option<StatsdClient>>,
}

impl DogStatsDReporter {
    /// Creates a reporter with default configuration.
    pub fn new() -> Self {
        Self::with_config(ReporterConfig::default())
    }

    /// Creates a reporter with the given configuration.
    pub fn with_config(config: ReporterConfig) -> Self {
        DogStatsDReporter { config: RwLock::new(config), client: Mutex::new(None) }
    }

    /// Applies a batch of raw configuration arguments.
    ///
    /// See [`ReporterConfig::update_arguments`] for the recognized keys and merge semantics.
    /// Options affecting the connection (prefix, hostname, port, tags) only take effect the
    /// next time a connection is established.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] if the port value is not a valid port number.
    pub fn update_arguments(
        &self,
        props: &HashMap<String, Vec<String>>,
    ) -> Result<(), ConfigError> {
        self.config.write().update_arguments(props)
    }

    /// Flattens `metrics` and emits one gauge per leaf numeric value.
    ///
    /// Nested keys are joined with `.` into dotted names. When a filter set is configured,
    /// it acts as an allow-list over the dequeued names; see
    /// [`ReporterConfig`] for the filtering contract. Configured static metrics are appended
    /// after all tree-derived metrics on every call.
    ///
    /// If no connection exists one is established first, so a report after [`close`][Self::close]
    /// transparently reconnects. A connection failure is logged and the report becomes a no-op;
    /// the next call will retry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidStaticMetric`] if a configured static metric entry is not
    /// in `name:value` form with a numeric value. Transport-level failures are absorbed and
    /// never surfaced here.
    pub fn report(&self, profiler_name: &str, metrics: &MetricTree) -> Result<(), ConfigError> {
        let config = self.config.read().clone();

        let mut client = self.client.lock();
        if client.is_none() {
            match StatsdClient::connect(
                &config.prefix,
                &config.hostname,
                config.port,
                &config.tags,
            ) {
                Ok(connected) => *client = Some(connected),
                Err(e) => {
                    error!(
                        error = %e,
                        hostname = %config.hostname,
                        port = config.port,
                        "Failed to connect statsd client, dropping report."
                    );
                }
            }
        }

        let mut flat = flatten::flatten(metrics, &config.filters);
        for entry in &config.statics {
            flat.push(config::parse_static_metric(entry)?);
        }

        debug!(profiler = profiler_name, samples = flat.len(), "Reporting flattened metrics.");

        if let Some(client) = client.as_ref() {
            for (name, value) in &flat {
                client.send_gauge(name, *value);
            }
        }

        Ok(())
    }

    /// Closes the connection to the server, if one exists.
    ///
    /// The reporter stays usable: the next [`report`][Self::report] call establishes a fresh
    /// connection from the configuration current at that point.
    pub fn close(&self) {
        let mut client = self.client.lock();
        if client.take().is_some() {
            debug!("Closed statsd client.");
        }
    }
}

impl Default for DogStatsDReporter {
    fn default() -> Self {
        Self::new()
    }
}
