//! Per-metric update task.
//!
//! A [`MetricUpdater`] owns the write handle of exactly one registered metric.
//! While running it recomputes the value on every tick of its interval; it
//! stops when the cancellation token fires. A failed random draw is logged
//! and the previous value stays in place until the next tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use sterno_core::error::Result;
use sterno_core::{MetricHandle, RandomSource, RandomValueGenerator, ValueSource};

pub struct MetricUpdater<S = Arc<dyn RandomSource>> {
    handle: MetricHandle,
    source: ValueSource,
    interval: Duration,
    rng: RandomValueGenerator<S>,
}

impl<S: RandomSource> MetricUpdater<S> {
    pub fn new(
        handle: MetricHandle,
        source: ValueSource,
        interval: Duration,
        rng: RandomValueGenerator<S>,
    ) -> Self {
        Self {
            handle,
            source,
            // tokio intervals reject a zero period
            interval: interval.max(Duration::from_nanos(1)),
            rng,
        }
    }

    pub fn handle(&self) -> &MetricHandle {
        &self.handle
    }

    /// Compute and store one value. On error the stored value is unchanged.
    pub fn tick(&self) -> Result<f64> {
        let value = match self.source {
            ValueSource::Static(v) => v,
            ValueSource::Random { min, max } => self.rng.next(min, max)? as f64,
        };
        self.handle.set(value);
        Ok(value)
    }

    /// Tick until `cancel` fires. The first tick happens immediately.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.tick() {
                        tracing::warn!(
                            metric = %self.handle.fq_name(),
                            code = e.code().as_str(),
                            error = %e,
                            "metric update skipped"
                        );
                    }
                }
            }
        }

        tracing::debug!(metric = %self.handle.fq_name(), "updater stopped");
    }
}
