//! sterno: synthetic metrics for exercising monitoring pipelines.
//!
//! - Reads a YAML/JSON config of named gauges
//! - One update task per metric (static or random value)
//! - Scrape endpoint: /metrics (Prometheus text / OpenMetrics)

use std::net::SocketAddr;
use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sterno_core::error::{Result, SternoError};
use sterno_exporter::{app_state::AppState, config, router, Engine};

#[derive(Debug, Parser)]
#[command(name = "sterno", version, about = "Synthetic metrics exporter")]
struct Args {
    /// Path to sterno configuration file; YAML or JSON
    #[arg(short, long, default_value = "sterno.conf")]
    config: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "sterno failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let cfg = config::load_from_file(&args.config)?;

    let cancel = CancellationToken::new();
    let engine = Engine::build(&cfg, cancel.clone())?;

    let state = AppState::new(engine.registry());
    let app = router::build_router(state.clone());

    let listen = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| SternoError::Internal(format!("bind {listen} failed: {e}")))?;
    tracing::info!(%listen, config = %args.config, "sterno listening");

    let shutdown = {
        let state = state.clone();
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            state.set_draining();
            cancel.cancel();
        }
    };

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| SternoError::Internal(format!("server failed: {e}")));

    engine.shutdown().await;
    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
