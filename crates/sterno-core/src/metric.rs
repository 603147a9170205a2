//! Metric declarations and their validation.
//!
//! A [`MetricDecl`] is the raw, deserialized form of one entry under `metrics:`
//! in the configuration. [`MetricDecl::validate`] applies defaults and checks
//! it, producing a [`MetricSpec`] whose value source is already resolved.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Result, SternoError};

/// Namespace and subsystem used when the configuration leaves them empty.
pub const DEFAULT_NAMESPACE: &str = "sterno";

/// Largest accepted `random_max`. Every integer up to 2^53 converts to `f64`
/// exactly, so stored random values stay strictly below `random_max`.
pub const MAX_RANDOM_BOUND: u64 = 1 << 53;

/// Raw metric declaration as it appears in the configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricDecl {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub subsystem: String,

    #[serde(default, rename = "type")]
    pub metric_type: String,

    #[serde(default)]
    pub help: Option<String>,

    #[serde(default)]
    pub random: bool,

    #[serde(default)]
    pub static_value: f64,

    #[serde(default)]
    pub random_min: u64,

    #[serde(default)]
    pub random_max: u64,
}

impl MetricDecl {
    /// Normalize and validate the declaration.
    ///
    /// Empty subsystem defaults to `sterno`. Fails with `UnsupportedType` for
    /// unknown types, `InvalidRange` for random bounds with `max <= min` or
    /// `max > 2^53`, and `InvalidName` for empty or illegal name components.
    pub fn validate(&self) -> Result<MetricSpec> {
        let subsystem = if self.subsystem.is_empty() {
            DEFAULT_NAMESPACE.to_string()
        } else {
            self.subsystem.clone()
        };

        let kind: MetricKind = self.metric_type.parse()?;

        let source = if self.random {
            if self.random_max <= self.random_min || self.random_max > MAX_RANDOM_BOUND {
                return Err(SternoError::InvalidRange {
                    min: self.random_min,
                    max: self.random_max,
                });
            }
            ValueSource::Random {
                min: self.random_min,
                max: self.random_max,
            }
        } else {
            ValueSource::Static(self.static_value)
        };

        check_name_component("name", &self.name)?;
        check_name_component("subsystem", &subsystem)?;

        Ok(MetricSpec {
            name: self.name.clone(),
            subsystem,
            kind,
            help: self.help.clone(),
            source,
        })
    }
}

/// Supported metric types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Gauge,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
        }
    }
}

impl FromStr for MetricKind {
    type Err = SternoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gauge" => Ok(MetricKind::Gauge),
            other => Err(SternoError::UnsupportedType(other.to_string())),
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a metric's value comes from on every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueSource {
    /// Constant value, set on every tick.
    Static(f64),
    /// Uniform draw from `[min, max)`; `min < max <= 2^53` holds after validation.
    Random { min: u64, max: u64 },
}

/// Validated metric declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSpec {
    pub name: String,
    pub subsystem: String,
    pub kind: MetricKind,
    pub help: Option<String>,
    pub source: ValueSource,
}

/// Registry identity of a metric. Two declarations with equal ids collide.
///
/// The type is not part of the identity: a name is unique across all kinds,
/// since exposition keys series by fully-qualified name alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricId {
    pub namespace: String,
    pub subsystem: String,
    pub name: String,
}

impl MetricId {
    pub fn new(namespace: &str, spec: &MetricSpec) -> Self {
        Self {
            namespace: namespace.to_string(),
            subsystem: spec.subsystem.clone(),
            name: spec.name.clone(),
        }
    }

    /// Fully-qualified name: non-empty components joined with `_`.
    pub fn fq_name(&self) -> String {
        [&self.namespace, &self.subsystem, &self.name]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fq_name())
    }
}

/// Check one name component against `[a-zA-Z_:][a-zA-Z0-9_:]*`.
pub fn check_name_component(what: &str, value: &str) -> Result<()> {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return Err(SternoError::InvalidName(format!("{what} must not be empty")));
    };
    let head_ok = first.is_ascii_alphabetic() || first == '_' || first == ':';
    let tail_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':');
    if !head_ok || !tail_ok {
        return Err(SternoError::InvalidName(format!("{what} {value:?}")));
    }
    Ok(())
}
