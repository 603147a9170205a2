//! Exposition of registry snapshots.
//!
//! Renders the generated metrics in Prometheus text format 0.0.4 or in
//! OpenMetrics 1.0, picked from the scrape request's `Accept` header.

pub mod exposition;
