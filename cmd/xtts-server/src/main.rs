//! xtts-server - HTTP service for speaker embeddings and voice-cloned speech.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xtts_engine::Gateway;
use xtts_service::{ServerConfig, VoiceService, router};

const DEFAULT_LOG_FILTER: &str = "xtts_server=info,xtts_service=info,xtts_engine=info,tower_http=info";

/// XTTS speaker embedding and speech synthesis server.
#[derive(Parser, Debug)]
#[command(name = "xtts-server")]
#[command(about = "XTTS speaker embedding and speech synthesis server")]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (e.g. :8000, 127.0.0.1:9000)
    #[arg(long)]
    addr: Option<String>,

    /// Load the model before accepting requests
    #[arg(long)]
    preload: bool,

    /// Inference worker executable
    #[arg(long)]
    worker: Option<String>,

    /// Inference worker argument (repeatable, replaces configured args)
    #[arg(long = "worker-arg", allow_hyphen_values = true)]
    worker_args: Vec<String>,
}

impl Args {
    fn load_config(&self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };
        if let Some(addr) = &self.addr {
            config.addr = addr.clone();
        }
        if self.preload {
            config.preload = true;
        }
        if let Some(program) = &self.worker {
            config.worker.program = program.clone();
        }
        if !self.worker_args.is_empty() {
            config.worker.args = self.worker_args.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = args.load_config()?;
    let addr = config.socket_addr()?;

    info!(
        worker = %config.worker.program,
        args = ?config.worker.args,
        "starting xtts-server"
    );

    let gateway = Arc::new(Gateway::new(config.worker.clone()));
    if config.preload {
        gateway
            .preload()
            .await
            .context("preload inference engine")?;
    } else {
        info!("engine will load on first request");
    }

    let service = VoiceService::new(gateway).with_latency_threshold(config.latency_warning_secs);
    let app = router(service, config.cors);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "xtts-server",
            "--addr",
            ":9000",
            "--preload",
            "--worker",
            "/opt/venv/bin/python",
            "--worker-arg",
            "worker.py",
            "--worker-arg",
            "--gpu",
        ]);
        let config = args.load_config().unwrap();
        assert_eq!(config.socket_addr().unwrap().port(), 9000);
        assert!(config.preload);
        assert_eq!(config.worker.program, "/opt/venv/bin/python");
        assert_eq!(config.worker.args, vec!["worker.py", "--gpu"]);
    }

    #[test]
    fn no_flags_keeps_defaults() {
        let config = Args::parse_from(["xtts-server"]).load_config().unwrap();
        assert_eq!(config.addr, "0.0.0.0:8000");
        assert!(!config.preload);
        assert!(config.cors);
    }

    #[test]
    fn invalid_addr_rejected() {
        let args = Args::parse_from(["xtts-server", "--addr", "nowhere"]);
        assert!(args.load_config().is_err());
    }
}
