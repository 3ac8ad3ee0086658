use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use service::pagination::Pagination;
use service::repo::SeaOrmStore;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, auth};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Connect, migrate and assemble the router for `cfg`.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    models::db::ping(&db).await.map_err(|e| StartupError::Database(e.to_string()))?;
    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None).await?;
        info!("migrations applied");
    }

    let store = Arc::new(SeaOrmStore::new(db));
    let pagination = Pagination::new(cfg.pagination.default_limit, cfg.pagination.max_limit);
    let state = auth::ServerState::new(store, pagination, auth::ServerAuthConfig { jwt_secret: cfg.auth.jwt_secret.clone() });
    Ok(routes::build_router(state, build_cors()))
}

/// Public entry: load configuration, build the app and serve until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let app = build_app(&cfg).await?;

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting farm registry server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}
