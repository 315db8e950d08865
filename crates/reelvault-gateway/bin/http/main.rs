mod cli;

use crate::cli::{StorageBackendArg, CLI};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::HeaderValue;
use clap::Parser;
use reelvault_catalog::CatalogService;
use reelvault_core::{Catalog, EntryStore};
use reelvault_gateway::auth::JwtVerifier;
use reelvault_gateway::{App, AppState};
use reelvault_storage::{InMemoryStore, MySqlStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = CLI::try_parse()?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        "starting catalog gateway"
    );

    let cors = cors_layer(config.cors_origin.as_deref())?;
    let jwt = JwtVerifier::new(&config.jwt_secret);

    match config.storage {
        StorageBackendArg::InMemory => {
            run_server(
                config.listen_addr,
                CatalogService::new(InMemoryStore::new()),
                jwt,
                cors,
            )
            .await?;
        }
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .ok_or("mysql dsn is required when storage backend is mysql")?;
            let store = MySqlStore::connect(&mysql_dsn).await?;
            run_server(config.listen_addr, CatalogService::new(store), jwt, cors).await?;
        }
    }

    Ok(())
}

async fn run_server<S: EntryStore>(
    listen_addr: SocketAddr,
    catalog: CatalogService<S>,
    jwt: JwtVerifier,
    cors: CorsLayer,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(Arc::new(catalog) as Arc<dyn Catalog>, jwt);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;

    axum::serve(listener, App::router(state, cors))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, Box<dyn std::error::Error>> {
    let layer = match origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE]),
        None => CorsLayer::permissive(),
    };
    Ok(layer)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received, draining connections");
}
