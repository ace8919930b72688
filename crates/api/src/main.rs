//! API server entry point.

use std::sync::Arc;

use api::config::Config;
use api::routes::books::BookStore;
use data_store::{InMemoryDataStore, PostgresDataStore};
use domain::Book;
use enrichment::InMemoryBookDataSource;
use tokio::signal;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
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

/// Opens the configured book store: PostgreSQL when a database URL is set,
/// memory otherwise.
async fn open_store(config: &Config) -> BookStore {
    match &config.database_url {
        Some(url) => {
            let store = PostgresDataStore::<Book>::connect(url)
                .await
                .expect("failed to connect to database");
            store
                .run_migrations()
                .await
                .expect("failed to run migrations");
            tracing::info!("using PostgreSQL book store");
            Arc::new(store)
        }
        None => {
            tracing::info!("using in-memory book store");
            Arc::new(InMemoryDataStore::<Book>::new())
        }
    }
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    api::telemetry::init_tracing(&config);

    // 2. Install Prometheus metrics recorder
    let metrics_handle =
        api::telemetry::install_metrics_recorder().expect("failed to install Prometheus recorder");

    // 3. Create the book store and application state
    let store = open_store(&config).await;
    let state = api::create_default_state(store);

    // 4. Start the enrichment worker
    let enrichment_worker = config.enrichment_enabled.then(|| {
        let enricher = api::create_enricher(
            &state,
            InMemoryBookDataSource::new("open-library"),
            InMemoryBookDataSource::new("isbndb"),
        );
        enricher.spawn(state.broadcast.subscribe())
    });

    // 5. Build the application
    let app = api::create_app(state, metrics_handle);

    // 6. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    if let Some(worker) = enrichment_worker {
        worker.abort();
    }
    tracing::info!("server shut down gracefully");
}
