use std::time::Duration;

use serde::Deserialize;
use sterno_core::error::{Result, SternoError};
use sterno_core::metric::{check_name_component, MetricDecl, DEFAULT_NAMESPACE};

use super::duration;

/// Update interval used when the config leaves it unset or zero.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub namespace: String,

    #[serde(default, deserialize_with = "duration::deserialize")]
    pub interval: Duration,

    #[serde(default = "default_reject_duplicates")]
    pub reject_duplicates: bool,

    #[serde(default)]
    pub metrics: Vec<MetricDecl>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            namespace: String::new(),
            interval: Duration::ZERO,
            reject_duplicates: default_reject_duplicates(),
            metrics: Vec::new(),
        }
    }
}

impl Config {
    /// Config-level checks. Per-metric validation happens at engine build.
    pub fn validate(&self) -> Result<()> {
        check_name_component("namespace", self.namespace())?;
        if self.port == 0 {
            return Err(SternoError::BadConfig("port must not be 0".into()));
        }
        Ok(())
    }

    /// Namespace, defaulting to `sterno` when empty.
    pub fn namespace(&self) -> &str {
        if self.namespace.is_empty() {
            DEFAULT_NAMESPACE
        } else {
            &self.namespace
        }
    }

    /// Update interval, defaulting to one second when zero.
    pub fn interval(&self) -> Duration {
        if self.interval.is_zero() {
            DEFAULT_INTERVAL
        } else {
            self.interval
        }
    }
}

fn default_port() -> u16 {
    8080
}
fn default_reject_duplicates() -> bool {
    true
}
