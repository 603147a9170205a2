//! Metric-generation engine.
//!
//! Turns a [`Config`] into a populated [`Registry`] with one running
//! [`MetricUpdater`] per declared metric. Building is all-or-nothing: every
//! declaration is validated and registered before the first updater is
//! spawned, so a failed build leaves no task behind and exposes no registry.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use sterno_core::error::{Result, SternoError};
use sterno_core::metric::{check_name_component, MetricId};
use sterno_core::{OsEntropy, RandomSource, RandomValueGenerator, Registry};

use crate::config::Config;
use crate::updater::MetricUpdater;

pub struct Engine {
    registry: Arc<Registry>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl Engine {
    /// Build the registry and start updaters, drawing random values from the
    /// OS entropy source. Must be called from within a tokio runtime.
    ///
    /// Cancelling `cancel`, calling [`Engine::shutdown`] or dropping the engine
    /// stops every updater. The engine never cancels the caller's token.
    pub fn build(cfg: &Config, cancel: CancellationToken) -> Result<Self> {
        Self::build_with_source(cfg, cancel, Arc::new(OsEntropy))
    }

    pub fn build_with_source(
        cfg: &Config,
        cancel: CancellationToken,
        source: Arc<dyn RandomSource>,
    ) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| SternoError::Internal(format!("engine needs a tokio runtime: {e}")))?;

        let cancel = cancel.child_token();
        let namespace = cfg.namespace();
        check_name_component("namespace", namespace)?;
        let interval = cfg.interval();

        // 1) Validate + register everything first
        let registry = Arc::new(Registry::new());
        let mut updaters = Vec::with_capacity(cfg.metrics.len());
        for decl in &cfg.metrics {
            let spec = decl.validate()?;
            let id = MetricId::new(namespace, &spec);

            let handle = match registry.register(id, spec.kind, spec.help.clone()) {
                Ok(h) => h,
                Err(SternoError::DuplicateMetric(name)) if !cfg.reject_duplicates => {
                    tracing::warn!(metric = %name, "duplicate metric declaration skipped");
                    continue;
                }
                Err(e) => return Err(e),
            };
            tracing::debug!(metric = %handle.fq_name(), kind = %spec.kind, source = ?spec.source, "metric registered");

            updaters.push(MetricUpdater::new(
                handle,
                spec.source,
                interval,
                RandomValueGenerator::with_source(Arc::clone(&source)),
            ));
        }

        // 2) Only now start the updaters
        let tasks = updaters
            .into_iter()
            .map(|u| runtime.spawn(u.run(cancel.clone())))
            .collect::<Vec<_>>();

        tracing::info!(metrics = tasks.len(), ?interval, %namespace, "engine started");

        Ok(Self {
            registry,
            cancel,
            tasks,
        })
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    /// Number of updaters that have not stopped yet.
    pub fn running(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    /// Stop every updater and wait for them to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        for task in std::mem::take(&mut self.tasks) {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "updater task failed");
            }
        }
        tracing::info!("engine stopped");
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
