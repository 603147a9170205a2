//! sterno core: metric declarations, value generation and the shared registry.
//!
//! This crate defines the pieces of the metric-generation engine that carry no
//! runtime or transport dependencies: the declaration validator, the bounded
//! random value generator, and the concurrently readable registry that
//! exporters render from. The exporter crate schedules updates on top of it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `SternoError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metric;
pub mod random;
pub mod registry;

/// Shared result type.
pub use error::{Result, SternoError};
pub use metric::{
    MetricDecl, MetricId, MetricKind, MetricSpec, ValueSource, DEFAULT_NAMESPACE,
    MAX_RANDOM_BOUND,
};
pub use random::{OsEntropy, RandomSource, RandomValueGenerator};
pub use registry::{MetricHandle, MetricSample, Registry};
