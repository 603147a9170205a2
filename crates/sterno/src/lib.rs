//! Top-level facade crate for sterno.
//!
//! Re-exports core types and the exporter library so users can depend on a single crate.

pub mod core {
    pub use sterno_core::*;
}

pub mod exporter {
    pub use sterno_exporter::*;
}
