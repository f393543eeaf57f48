//! munind — Muninn daemon.
//!
//! Serves the task [`Orchestrator`](muninn::Orchestrator) over HTTP,
//! turning customer-interaction data into structured insight.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use muninn::server::config::{Config, Secrets};
use muninn::{Muninn, MuninnError, Orchestrator};

/// Muninn daemon — conversation insight service.
#[derive(Parser)]
#[command(name = "munind")]
#[command(version)]
#[command(about = "Muninn conversation insight daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;

    // Build the orchestrator from config
    let orchestrator = build_orchestrator(&config, &secrets)?;

    // Parse address
    let addr: SocketAddr = config
        .server
        .address
        .parse()
        .map_err(|e| MuninnError::Configuration(format!("Invalid address: {e}")))?;

    info!(version = env!("CARGO_PKG_VERSION"), %addr, "munind starting");

    let router = muninn::server::router(Arc::new(orchestrator));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Build an [`Orchestrator`] from configuration.
fn build_orchestrator(config: &Config, secrets: &Secrets) -> Result<Orchestrator, MuninnError> {
    let mut builder = Muninn::builder();

    if let Some(key) = secrets.api_key("openai") {
        builder = builder.openai(key);
    }

    if let Some(ref base_url) = config.model.base_url {
        builder = builder.openai_base_url(base_url);
    }
    if let Some(ref model) = config.model.chat_model {
        builder = builder.chat_model(model);
    }
    if let Some(ref model) = config.model.transcription_model {
        builder = builder.transcription_model(model);
    }

    if let Some(ref retrieval) = config.retrieval {
        if let Some(key) = secrets.api_key("pinecone") {
            builder = builder
                .pinecone(key, &retrieval.base_url)
                .top_k(retrieval.top_k);
        }
    }

    if let Some(ref path) = config.store.data_path {
        builder = builder.data_path(path);
    }

    builder = builder.max_audio_bytes(config.server.limits.max_audio_bytes);

    builder.build()
}
