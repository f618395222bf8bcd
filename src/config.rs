use std::collections::{HashMap, HashSet};
use std::num::ParseIntError;

use thiserror::Error;
use tracing::debug;

pub(crate) const PREFIX_KEY: &str = "datadog.statsd.prefix";
pub(crate) const HOSTNAME_KEY: &str = "datadog.statsd.hostname";
pub(crate) const PORT_KEY: &str = "datadog.statsd.port";
pub(crate) const TAGS_KEY: &str = "datadog.statsd.tags";
pub(crate) const STATICS_KEY: &str = "datadog.statsd.statics";
pub(crate) const FILTERS_KEY: &str = "datadog.statsd.filters";

/// Errors that could occur while parsing reporter configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The value given for `datadog.statsd.port` was not a valid port number.
    #[error("invalid value '{value}' for 'datadog.statsd.port'")]
    InvalidPort {
        /// The raw value that failed to parse.
        value: String,

        /// The underlying parse failure.
        #[source]
        source: ParseIntError,
    },

    /// A static metric entry was not in `name:value` form with a numeric value.
    #[error("malformed static metric entry '{entry}': expected 'name:value' with a numeric value")]
    InvalidStaticMetric {
        /// The offending entry.
        entry: String,
    },
}

/// Tunable state for the reporter.
///
/// Populated from raw key/value-list arguments via [`update_arguments`][Self::update_arguments],
/// typically sourced from an external YAML or properties loader. Every reporting call operates
/// on a snapshot of this configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReporterConfig {
    pub(crate) prefix: String,
    pub(crate) hostname: String,
    pub(crate) port: u16,
    pub(crate) tags: Vec<String>,
    pub(crate) statics: Vec<String>,
    pub(crate) filters: HashSet<String>,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        ReporterConfig {
            prefix: String::new(),
            hostname: "localhost".to_string(),
            port: 8125,
            tags: Vec::new(),
            statics: Vec::new(),
            filters: HashSet::new(),
        }
    }
}

impl ReporterConfig {
    /// Applies one batch of raw reporter arguments.
    ///
    /// Each recognized option is read from the first element of its value list; any further
    /// elements are ignored. Unrecognized keys are ignored silently, as are entries with an
    /// empty value list or a blank first element. Keys absent from `props` keep their current
    /// values, so repeated calls merge rather than reset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] if the port value is not a valid port number.
    /// Entries already processed before the failing one remain applied.
    pub fn update_arguments(
        &mut self,
        props: &HashMap<String, Vec<String>>,
    ) -> Result<(), ConfigError> {
        for (key, values) in props {
            let Some(value) = values.first().map(String::as_str) else {
                continue;
            };
            if value.trim().is_empty() {
                continue;
            }

            match key.as_str() {
                PREFIX_KEY => {
                    debug!(value, "Setting statsd prefix.");
                    self.prefix = value.to_string();
                }
                HOSTNAME_KEY => {
                    debug!(value, "Setting statsd hostname.");
                    self.hostname = value.to_string();
                }
                PORT_KEY => {
                    debug!(value, "Setting statsd port.");
                    self.port = value.parse().map_err(|source| ConfigError::InvalidPort {
                        value: value.to_string(),
                        source,
                    })?;
                }
                TAGS_KEY => {
                    debug!(value, "Setting constant tags.");
                    self.tags = split_list(value);
                }
                STATICS_KEY => {
                    debug!(value, "Setting static metrics.");
                    self.statics = split_list(value);
                }
                FILTERS_KEY => {
                    debug!(value, "Setting metric filters.");
                    self.filters = split_list(value).into_iter().collect();
                }
                _ => {}
            }
        }

        Ok(())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value.split(';').filter(|entry| !entry.is_empty()).map(str::to_string).collect()
}

/// Parses a static metric entry of the form `name:value`.
///
/// The entry is split on the first `:`, and everything after it must parse as a float.
pub(crate) fn parse_static_metric(entry: &str) -> Result<(String, f64), ConfigError> {
    let malformed = || ConfigError::InvalidStaticMetric { entry: entry.to_string() };

    let (name, raw_value) = entry.split_once(':').ok_or_else(malformed)?;
    let value = raw_value.parse::<f64>().map_err(|_| malformed())?;

    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{parse_static_metric, ConfigError, ReporterConfig};

    fn args(entries: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(key, values)| {
                ((*key).to_string(), values.iter().map(|v| (*v).to_string()).collect())
            })
            .collect()
    }

    #[test]
    fn defaults() {
        let config = ReporterConfig::default();
        assert_eq!(config.prefix, "");
        assert_eq!(config.hostname, "localhost");
        assert_eq!(config.port, 8125);
        assert!(config.tags.is_empty());
        assert!(config.statics.is_empty());
        assert!(config.filters.is_empty());
    }

    #[test]
    fn recognized_keys() {
        let mut config = ReporterConfig::default();
        config
            .update_arguments(&args(&[
                ("datadog.statsd.prefix", &["jvm"]),
                ("datadog.statsd.hostname", &["agent.local"]),
                ("datadog.statsd.port", &["9999"]),
                ("datadog.statsd.tags", &["env:test;role:profiler"]),
                ("datadog.statsd.statics", &["up:1;ratio:0.5"]),
                ("datadog.statsd.filters", &["cpu;heap"]),
            ]))
            .unwrap();

        assert_eq!(config.prefix, "jvm");
        assert_eq!(config.hostname, "agent.local");
        assert_eq!(config.port, 9999);
        assert_eq!(config.tags, vec!["env:test", "role:profiler"]);
        assert_eq!(config.statics, vec!["up:1", "ratio:0.5"]);
        assert!(config.filters.contains("cpu"));
        assert!(config.filters.contains("heap"));
        assert_eq!(config.filters.len(), 2);
    }

    #[test]
    fn first_element_wins() {
        let mut config = ReporterConfig::default();
        config
            .update_arguments(&args(&[("datadog.statsd.hostname", &["first", "second"])]))
            .unwrap();

        assert_eq!(config.hostname, "first");
    }

    #[test]
    fn unrecognized_keys_ignored() {
        let mut config = ReporterConfig::default();
        config.update_arguments(&args(&[("datadog.statsd.bogus", &["whatever"])])).unwrap();

        assert_eq!(config, ReporterConfig::default());
    }

    #[test]
    fn blank_values_skip_only_their_entry() {
        // A blank value must not short-circuit the rest of the batch.
        let mut config = ReporterConfig::default();
        config
            .update_arguments(&args(&[
                ("datadog.statsd.prefix", &["  "]),
                ("datadog.statsd.hostname", &[]),
                ("datadog.statsd.port", &["9999"]),
            ]))
            .unwrap();

        assert_eq!(config.prefix, "");
        assert_eq!(config.hostname, "localhost");
        assert_eq!(config.port, 9999);
    }

    #[test]
    fn disjoint_updates_merge() {
        let mut config = ReporterConfig::default();
        config.update_arguments(&args(&[("datadog.statsd.prefix", &["jvm"])])).unwrap();
        config.update_arguments(&args(&[("datadog.statsd.port", &["9125"])])).unwrap();

        assert_eq!(config.prefix, "jvm");
        assert_eq!(config.port, 9125);
    }

    #[test]
    fn invalid_port_errors() {
        let mut config = ReporterConfig::default();
        let result = config.update_arguments(&args(&[("datadog.statsd.port", &["statsd"])]));

        assert!(matches!(result, Err(ConfigError::InvalidPort { value, .. }) if value == "statsd"));
    }

    #[test]
    fn empty_list_segments_dropped() {
        let mut config = ReporterConfig::default();
        config.update_arguments(&args(&[("datadog.statsd.tags", &["env:test;"])])).unwrap();

        assert_eq!(config.tags, vec!["env:test"]);
    }

    #[test]
    fn static_metric_parsing() {
        assert_eq!(parse_static_metric("up:1").unwrap(), ("up".to_string(), 1.0));
        assert_eq!(parse_static_metric("ratio:0.5").unwrap(), ("ratio".to_string(), 0.5));

        assert!(matches!(
            parse_static_metric("up"),
            Err(ConfigError::InvalidStaticMetric { entry }) if entry == "up"
        ));
        assert!(matches!(
            parse_static_metric("up:one"),
            Err(ConfigError::InvalidStaticMetric { entry }) if entry == "up:one"
        ));
    }
}
