use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use resizer_core::{ImagePipeline, IpfsClient, ResultCache};
use resizer_proxy::{AppState, ServerConfig, build_router};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "resizer_proxy=debug,resizer_core=debug,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        host = %config.host,
        port = config.port,
        ipfs_api_url = %config.ipfs_api_url,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        cache_sweep_interval_secs = config.cache_sweep_interval.as_secs(),
        fetch_timeout_secs = config.fetch_timeout.as_secs(),
        request_timeout_secs = config.request_timeout.as_secs(),
        "loaded configuration"
    );

    let fetcher = match IpfsClient::new(&config.ipfs_api_url, config.fetch_timeout) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "failed to create IPFS client");
            return ExitCode::FAILURE;
        }
    };

    let cache = ResultCache::start(config.cache_ttl, config.cache_sweep_interval);

    let addr = match config.host.parse::<std::net::IpAddr>() {
        Ok(ip) => SocketAddr::new(ip, config.port),
        Err(e) => {
            tracing::error!(host = %config.host, error = %e, "invalid HOST address");
            return ExitCode::FAILURE;
        }
    };

    let state = AppState {
        pipeline: ImagePipeline::new(Arc::new(fetcher), cache.clone()),
        config: Arc::new(config),
    };
    let app = build_router(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind");
            cache.shutdown().await;
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(%addr, "image resize proxy listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    tracing::info!("server stopped accepting connections, cleaning up");
    cache.shutdown().await;
    tracing::info!("cache sweeper stopped");

    if let Err(e) = served {
        tracing::error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    tracing::info!("graceful shutdown complete");
    ExitCode::SUCCESS
}

/// SIGINT (Ctrl-C) または SIGTERM を待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}
