//! 商店后端服务入口

use anyhow::Context;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use shop_backend::infrastructure::config::{load_config, StoreBackend};
use shop_backend::infrastructure::logger::Logger;
use shop_backend::{router, AppState, Collections};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;
    Logger::init(&config.logging);

    info!(backend = ?config.database.backend, "starting shop backend");

    #[cfg(feature = "database")]
    let mut database = None;

    let collections = match config.database.backend {
        StoreBackend::Memory => Collections::in_memory(),
        #[cfg(feature = "database")]
        StoreBackend::Postgres => {
            let db = shop_backend::infrastructure::database::DatabaseManager::new(&config.database)
                .await
                .context("failed to connect to database")?;
            let collections = Collections::postgres(&db)
                .await
                .context("failed to prepare collections")?;
            database = Some(db);
            collections
        }
        #[cfg(not(feature = "database"))]
        StoreBackend::Postgres => {
            anyhow::bail!("postgres backend requires the `database` feature")
        }
    };

    let state = AppState::new(collections, config.catalog.clone())
        .context("failed to load templates")?;
    let timeout = Duration::from_secs(config.http.timeout_seconds);
    let app = router(state).layer(TimeoutLayer::new(timeout));

    let addr = format!("{}:{}", config.http.bind_address, config.http.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("🚀 shop backend listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    #[cfg(feature = "database")]
    if let Some(db) = database {
        db.close().await;
    }

    info!("shop backend stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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

    info!("shutdown signal received");
}
