//! Shared application state for the exporter HTTP surface.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sterno_core::Registry;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    registry: Arc<Registry>,
    draining: AtomicBool,
}

impl AppState {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                registry,
                draining: AtomicBool::new(false),
            }),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// Mark draining state.
    pub fn set_draining(&self) {
        self.inner.draining.store(true, Ordering::Relaxed);
    }

    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::Relaxed)
    }
}
