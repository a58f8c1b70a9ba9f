use anyhow::{Context, Result};
use channel_dashboard::{cli, config, feed, routes, state};
use clap::Parser;
use std::io::ErrorKind;
use std::sync::Arc;
use tokio::net::TcpListener;

/// A busy port is reported with both ways of moving the dashboard.
async fn bind_listener(host: &str, port: u16) -> Result<TcpListener> {
    TcpListener::bind((host, port))
        .await
        .map_err(|err| match err.kind() {
            ErrorKind::AddrInUse => anyhow::anyhow!(
                "dashboard port {port} is already taken on {host}; pass --port or set DASHBOARD_PORT to serve on another port"
            ),
            _ => anyhow::Error::new(err).context(format!("cannot listen on {host}:{port}")),
        })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {err:#}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let default_filter = if args.debug_enabled() {
        "debug,hyper=info,reqwest=info"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let config = config::DashboardConfig::from_env()?;
    let http = reqwest::Client::builder()
        .user_agent(concat!("channel-dashboard/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")?;
    let feed = Arc::new(feed::FeedClient::new(http, config.feed.clone()));

    tracing::info!(
        channel_id = %config.feed.channel_id,
        results = config.feed.results,
        private = config.feed.api_key.is_some(),
        base_url = %config.feed.base_url,
        "feed configured"
    );

    let state = state::AppState { config, feed };
    let app = routes::router(state);

    let listener = bind_listener(&args.host, args.port).await?;
    let addr = listener.local_addr().context("listener has no local address")?;
    tracing::info!(%addr, "dashboard listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
