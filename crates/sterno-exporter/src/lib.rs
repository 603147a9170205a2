//! sterno exporter library entry.
//!
//! Wires configuration loading, the metric-generation engine, per-metric
//! updaters and the HTTP scrape surface together. It is consumed by the
//! binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod engine;
pub mod obs;
pub mod ops;
pub mod router;
pub mod updater;

pub use engine::Engine;
