use std::net::SocketAddr;
use std::sync::Arc;

use log::LevelFilter;
use simple_logger::SimpleLogger;

use kart_coupon_service::app_config::AppConfig;
use kart_coupon_service::catalog::ProductCatalog;
use kart_coupon_service::coupon::factory::{create_reader, HDD_READER};
use kart_coupon_service::http::routes::build_router;
use kart_coupon_service::http::state::AppState;
use kart_coupon_service::orders::OrderStore;

fn level_filter(name: &str) -> LevelFilter {
    match name {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    SimpleLogger::new()
        .with_level(level_filter(&config.log_level))
        .init()
        .unwrap();

    log::info!("loaded configuration: {:?}", config);
    log::info!("starting kart-coupon-service in {} mode", config.environment);

    let reader = match create_reader(
        HDD_READER,
        &config.coupon_code_folder_path,
        config.coupon_code_file_partial_index_chunk_size,
        config.coupon_code_file_concurrent_pool_size,
    ) {
        Ok(reader) => reader,
        Err(e) => {
            log::error!("failed to create coupon code file reader: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState {
        reader,
        catalog: Arc::new(ProductCatalog::new()),
        orders: Arc::new(OrderStore::new()),
    };

    let router = build_router(state).into_make_service_with_connect_info::<SocketAddr>();

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap_or_else(|e| {
        log::error!("failed to bind {}: {}", addr, e);
        std::process::exit(1);
    });

    log::info!("server started successfully and listening for requests, port: {}", config.port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap_or_else(|e| log::error!("server failed: {}", e));
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::warn!("received termination signal, shutting down server...");
}
