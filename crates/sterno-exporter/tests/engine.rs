//! Engine build and updater scheduling tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use sterno_core::error::{ErrorCode, Result, SternoError};
use sterno_core::RandomSource;
use sterno_exporter::config::{self, Config};
use sterno_exporter::Engine;

const TICK: Duration = Duration::from_millis(10);

fn cfg(yaml: &str) -> Config {
    config::load_from_str(yaml).unwrap()
}

fn build_err(cfg: &Config) -> SternoError {
    match Engine::build(cfg, CancellationToken::new()) {
        Ok(_) => panic!("build must fail"),
        Err(e) => e,
    }
}

/// Succeeds once with a fixed word, then fails forever.
struct FailsAfterFirst {
    calls: AtomicUsize,
}

impl RandomSource for FailsAfterFirst {
    fn next_u64(&self) -> Result<u64> {
        if self.calls.fetch_add(1, Ordering::Relaxed) == 0 {
            Ok(3)
        } else {
            Err(SternoError::EntropyUnavailable("pool drained".into()))
        }
    }
}

/// Counts every draw.
struct CountingSource {
    calls: AtomicUsize,
}

impl RandomSource for CountingSource {
    fn next_u64(&self) -> Result<u64> {
        Ok(self.calls.fetch_add(1, Ordering::Relaxed) as u64)
    }
}

#[tokio::test(start_paused = true)]
async fn static_metric_is_exposed() {
    let cfg = cfg(r#"
namespace: sterno
interval: 10ms
metrics:
  - { name: a, type: gauge, static_value: 42 }
"#);
    let engine = Engine::build(&cfg, CancellationToken::new()).unwrap();
    let reg = engine.registry();

    for _ in 0..5 {
        tokio::time::sleep(TICK).await;
        assert_eq!(reg.get_by_name("sterno_sterno_a"), Some(42.0));
    }

    let snap = reg.snapshot();
    assert_eq!(snap.len(), 1);
    assert_eq!(snap[0].fq_name, "sterno_sterno_a");
    assert_eq!(snap[0].value, 42.0);
    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn random_metric_stays_in_bounds() {
    let cfg = cfg(r#"
interval: 10ms
metrics:
  - { name: b, type: gauge, random: true, random_min: 10, random_max: 20 }
"#);
    let engine = Engine::build(&cfg, CancellationToken::new()).unwrap();
    let reg = engine.registry();

    let mut seen = Vec::with_capacity(1000);
    for _ in 0..1000 {
        tokio::time::sleep(TICK).await;
        seen.push(reg.get_by_name("sterno_sterno_b").unwrap());
    }

    assert!(seen.iter().all(|v| (10.0..20.0).contains(v)));
    assert!(seen.iter().all(|v| v.fract() == 0.0));
    assert!(seen.iter().any(|v| *v != seen[0]), "generator looks stuck");
    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn entropy_failure_keeps_last_value() {
    let cfg = cfg(r#"
interval: 10ms
metrics:
  - { name: r, type: gauge, random: true, random_min: 10, random_max: 20 }
"#);
    let source = Arc::new(FailsAfterFirst {
        calls: AtomicUsize::new(0),
    });
    let engine =
        Engine::build_with_source(&cfg, CancellationToken::new(), source.clone()).unwrap();
    let reg = engine.registry();

    for _ in 0..10 {
        tokio::time::sleep(TICK).await;
        assert_eq!(reg.get_by_name("sterno_sterno_r"), Some(13.0));
    }
    assert!(source.calls.load(Ordering::Relaxed) > 5, "updater must keep ticking");
    assert_eq!(engine.running(), 1);
    engine.shutdown().await;
}

#[tokio::test]
async fn unsupported_type_fails_build() {
    let cfg = cfg(r#"
metrics:
  - { name: ok, type: gauge, static_value: 1 }
  - { name: c, type: counter }
"#);
    let err = build_err(&cfg);
    assert_eq!(err.code(), ErrorCode::UnsupportedType);
}

#[tokio::test(start_paused = true)]
async fn failed_build_starts_no_updaters() {
    let cfg = cfg(r#"
interval: 10ms
metrics:
  - { name: ok, type: gauge, random: true, random_min: 0, random_max: 100 }
  - { name: c, type: counter }
"#);
    let source = Arc::new(CountingSource {
        calls: AtomicUsize::new(0),
    });
    let res = Engine::build_with_source(&cfg, CancellationToken::new(), source.clone());
    let Err(err) = res else {
        panic!("build must fail");
    };
    assert_eq!(err.code(), ErrorCode::UnsupportedType);

    tokio::time::sleep(TICK * 5).await;
    assert_eq!(source.calls.load(Ordering::Relaxed), 0);
}

#[tokio::test(start_paused = true)]
async fn random_bounds_above_f64_precision_fail_build() {
    let cfg = cfg(r#"
metrics:
  - { name: big, type: gauge, random: true, random_min: 1152921504606846976, random_max: 1152921504606846986 }
"#);
    assert_eq!(build_err(&cfg).code(), ErrorCode::InvalidRange);
}

#[tokio::test]
async fn invalid_range_fails_build() {
    let cfg = cfg(r#"
metrics:
  - { name: r, type: gauge, random: true, random_min: 20, random_max: 10 }
"#);
    assert_eq!(build_err(&cfg).code(), ErrorCode::InvalidRange);
}

#[tokio::test]
async fn duplicate_fails_build() {
    let cfg = cfg(r#"
metrics:
  - { name: a, type: gauge, static_value: 1 }
  - { name: a, subsystem: sterno, type: gauge, static_value: 2 }
"#);
    let err = build_err(&cfg);
    assert_eq!(err.code(), ErrorCode::DuplicateMetric);
    assert!(err.to_string().contains("sterno_sterno_a"));
}

#[tokio::test(start_paused = true)]
async fn duplicate_skipped_when_permissive() {
    let cfg = cfg(r#"
interval: 10ms
reject_duplicates: false
metrics:
  - { name: a, type: gauge, static_value: 1 }
  - { name: a, type: gauge, static_value: 2 }
  - { name: b, type: gauge, static_value: 3 }
"#);
    let engine = Engine::build(&cfg, CancellationToken::new()).unwrap();
    let reg = engine.registry();
    tokio::time::sleep(TICK).await;

    assert_eq!(reg.len(), 2);
    assert_eq!(reg.get_by_name("sterno_sterno_a"), Some(1.0));
    assert_eq!(engine.running(), 2);
    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn same_name_in_other_subsystem_is_fine() {
    let cfg = cfg(r#"
namespace: app
interval: 10ms
metrics:
  - { name: a, subsystem: x, type: gauge, static_value: 1 }
  - { name: a, subsystem: y, type: gauge, static_value: 2 }
"#);
    let engine = Engine::build(&cfg, CancellationToken::new()).unwrap();
    tokio::time::sleep(TICK).await;

    let names: Vec<String> = engine
        .registry()
        .snapshot()
        .into_iter()
        .map(|s| s.fq_name)
        .collect();
    assert_eq!(names, vec!["app_x_a", "app_y_a"]);
    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_every_updater() {
    let cfg = cfg(r#"
interval: 10ms
metrics:
  - { name: a, type: gauge, static_value: 1 }
  - { name: b, type: gauge, random: true, random_min: 0, random_max: 100 }
  - { name: c, type: gauge, static_value: 3 }
"#);
    let cancel = CancellationToken::new();
    let engine = Engine::build(&cfg, cancel.clone()).unwrap();
    tokio::time::sleep(TICK).await;
    assert_eq!(engine.running(), 3);

    cancel.cancel();
    tokio::time::sleep(TICK).await;
    assert_eq!(engine.running(), 0);

    // Values survive the stop.
    assert_eq!(engine.registry().get_by_name("sterno_sterno_c"), Some(3.0));
}

#[tokio::test(start_paused = true)]
async fn shutdown_leaves_caller_token_alone() {
    let cfg = cfg("metrics:\n  - { name: a, type: gauge, static_value: 1 }\n");
    let cancel = CancellationToken::new();
    let engine = Engine::build(&cfg, cancel.clone()).unwrap();
    let reg = engine.registry();
    tokio::time::sleep(TICK).await;

    engine.shutdown().await;
    assert!(!cancel.is_cancelled());
    assert_eq!(reg.get_by_name("sterno_sterno_a"), Some(1.0));
}

#[tokio::test]
async fn empty_config_builds_empty_registry() {
    let engine = Engine::build(&Config::default(), CancellationToken::new()).unwrap();
    assert!(engine.registry().is_empty());
    assert_eq!(engine.running(), 0);
    engine.shutdown().await;
}

#[test]
fn build_outside_runtime_fails() {
    let err = build_err(&Config::default());
    assert_eq!(err.code(), ErrorCode::Internal);
}
