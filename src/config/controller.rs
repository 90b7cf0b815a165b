//! # Controller Configuration
//!
//! Controller-level settings loaded from environment variables.

use crate::constants::{
    DEFAULT_BACKOFF_MAX_MS, DEFAULT_BACKOFF_START_MS, DEFAULT_MAX_CONCURRENT_RECONCILES,
    DEFAULT_METRICS_PORT, DEFAULT_RECONCILE_TIMEOUT_SECS, DEFAULT_WATCH_RESTART_DELAY_SECS,
};
use std::time::Duration;

/// Controller-level configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
/// Environment variables are populated from a ConfigMap using `envFrom` in the deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Maximum concurrent reconciliations across distinct `GlueJob` objects
    pub max_concurrent_reconciles: usize,
    /// Deadline for a single reconciliation pass (seconds)
    pub reconcile_timeout_secs: u64,
    /// Exponential backoff starting value (milliseconds)
    pub backoff_start_ms: u64,
    /// Exponential backoff maximum value (milliseconds)
    pub backoff_max_ms: u64,
    /// Delay before restarting the watch stream after it ends (seconds)
    pub watch_restart_delay_secs: u64,
    /// HTTP port for metrics and probes
    pub metrics_port: u16,
    /// AWS region override; the SDK default chain decides when unset
    pub aws_region: Option<String>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_reconciles: DEFAULT_MAX_CONCURRENT_RECONCILES,
            reconcile_timeout_secs: DEFAULT_RECONCILE_TIMEOUT_SECS,
            backoff_start_ms: DEFAULT_BACKOFF_START_MS,
            backoff_max_ms: DEFAULT_BACKOFF_MAX_MS,
            watch_restart_delay_secs: DEFAULT_WATCH_RESTART_DELAY_SECS,
            metrics_port: DEFAULT_METRICS_PORT,
            aws_region: None,
        }
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            max_concurrent_reconciles: parse_or_default(
                &lookup,
                "MAX_CONCURRENT_RECONCILES",
                defaults.max_concurrent_reconciles,
            )
            .max(1),
            reconcile_timeout_secs: parse_or_default(
                &lookup,
                "RECONCILE_TIMEOUT_SECS",
                defaults.reconcile_timeout_secs,
            ),
            backoff_start_ms: parse_or_default(&lookup, "BACKOFF_START_MS", defaults.backoff_start_ms),
            backoff_max_ms: parse_or_default(&lookup, "BACKOFF_MAX_MS", defaults.backoff_max_ms),
            watch_restart_delay_secs: parse_or_default(
                &lookup,
                "WATCH_RESTART_DELAY_SECS",
                defaults.watch_restart_delay_secs,
            ),
            metrics_port: parse_or_default(&lookup, "METRICS_PORT", defaults.metrics_port),
            aws_region: lookup("AWS_REGION").filter(|region| !region.trim().is_empty()),
        }
    }

    /// Get the reconcile deadline duration
    #[must_use]
    pub fn reconcile_timeout(&self) -> Duration {
        Duration::from_secs(self.reconcile_timeout_secs)
    }

    /// Get backoff start duration
    #[must_use]
    pub fn backoff_start_duration(&self) -> Duration {
        Duration::from_millis(self.backoff_start_ms)
    }

    /// Get backoff max duration
    #[must_use]
    pub fn backoff_max_duration(&self) -> Duration {
        Duration::from_millis(self.backoff_max_ms)
    }

    /// Get watch restart delay duration
    #[must_use]
    pub fn watch_restart_delay(&self) -> Duration {
        Duration::from_secs(self.watch_restart_delay_secs)
    }
}

/// Read a key through `lookup` and parse it, or return the default value
fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = ControllerConfig::from_lookup(|_| None);
        assert_eq!(config, ControllerConfig::default());
        assert_eq!(config.max_concurrent_reconciles, 1);
        assert_eq!(config.metrics_port, 5000);
    }

    #[test]
    fn test_max_concurrent_reconciles_override() {
        let config = ControllerConfig::from_lookup(lookup_from(&[("MAX_CONCURRENT_RECONCILES", "8")]));
        assert_eq!(config.max_concurrent_reconciles, 8);
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = ControllerConfig::from_lookup(lookup_from(&[
            ("MAX_CONCURRENT_RECONCILES", "many"),
            ("METRICS_PORT", "99999"),
            ("RECONCILE_TIMEOUT_SECS", "-3"),
        ]));
        assert_eq!(config.max_concurrent_reconciles, 1);
        assert_eq!(config.metrics_port, 5000);
        assert_eq!(config.reconcile_timeout_secs, 60);
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let config = ControllerConfig::from_lookup(lookup_from(&[("MAX_CONCURRENT_RECONCILES", "0")]));
        assert_eq!(config.max_concurrent_reconciles, 1);
    }

    #[test]
    fn test_blank_region_is_ignored() {
        let config = ControllerConfig::from_lookup(lookup_from(&[("AWS_REGION", "  ")]));
        assert_eq!(config.aws_region, None);

        let config = ControllerConfig::from_lookup(lookup_from(&[("AWS_REGION", "eu-west-1")]));
        assert_eq!(config.aws_region.as_deref(), Some("eu-west-1"));
    }
}
