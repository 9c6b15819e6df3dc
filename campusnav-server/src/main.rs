mod api;
mod config;
mod error;
mod state;
mod worker;

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum::error_handling::HandleErrorLayer;
use campusnav_core::load_campus_graph;
use clap::Parser;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{config::ServerConfig, error::handle_middleware_error, state::AppState};

/// HTTP host for the campus navigation engine
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Address to listen on
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Location feed (JSON or CSV)
    #[arg(long)]
    nodes: Option<PathBuf>,
    /// Path feed (JSON or CSV)
    #[arg(long)]
    edges: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("campusnav=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if cli.nodes.is_some() {
        config.data.nodes_path = cli.nodes;
    }
    if cli.edges.is_some() {
        config.data.edges_path = cli.edges;
    }

    let data = config.data.campus_data()?;
    let graph = tokio::task::spawn_blocking(move || load_campus_graph(&data)).await??;
    info!(
        "Serving campus graph generation {} ({} nodes)",
        graph.generation(),
        graph.node_count()
    );

    let state = Arc::new(AppState::new(
        graph,
        config.navigation.clone(),
        config.server.poll_interval(),
    ));
    let app = api::router(state)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(config.server.request_timeout())
                .concurrency_limit(config.server.concurrency_limit),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.server.bind).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
