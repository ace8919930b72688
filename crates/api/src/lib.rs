//! HTTP API server with observability for the library book collection.
//!
//! Provides REST endpoints for managing books and their lending state,
//! with structured logging (tracing), Prometheus metrics and per-request
//! correlation ids carried onto every domain event.

pub mod config;
pub mod correlation;
pub mod error;
pub mod routes;
pub mod telemetry;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};
use common::SystemClock;
use dispatch::{
    BroadcastListener, FanOutDispatcher, LendingActivityView, LogNotifier, NotificationListener,
};
use enrichment::{BookEnricher, InMemoryBookDataSource};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::books::{AppState, BookStore};

/// Enrichment worker as wired by [`create_default_state`].
pub type DefaultEnricher = BookEnricher<BookStore, Arc<FanOutDispatcher>, SystemClock>;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::system::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::system::health))
        .route(
            "/api/books",
            post(routes::books::create).get(routes::books::list),
        )
        .route(
            "/api/books/{id}",
            get(routes::books::get).delete(routes::books::delete),
        )
        .route("/api/books/{id}/title", put(routes::books::update_title))
        .route(
            "/api/books/{id}/authors",
            put(routes::books::update_authors).delete(routes::books::remove_authors),
        )
        .route(
            "/api/books/{id}/numberOfPages",
            put(routes::books::update_number_of_pages)
                .delete(routes::books::remove_number_of_pages),
        )
        .route("/api/books/{id}/borrow", post(routes::books::borrow))
        .route("/api/books/{id}/return", post(routes::books::return_book))
        .with_state(state)
        .merge(metrics_router)
        .layer(middleware::from_fn(correlation::propagate))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state around the given book store.
///
/// Every committed event is delivered, in order, to the lending activity view,
/// the log notifier and a broadcast channel that asynchronous consumers such
/// as the enrichment worker subscribe to.
pub fn create_default_state(store: BookStore) -> Arc<AppState> {
    let activity = LendingActivityView::new();
    let broadcast = BroadcastListener::default();

    let dispatcher = FanOutDispatcher::new()
        .with_listener(Arc::new(activity.clone()))
        .with_listener(Arc::new(NotificationListener::new(LogNotifier)))
        .with_listener(Arc::new(broadcast.clone()));

    Arc::new(AppState {
        store,
        dispatcher: Arc::new(dispatcher),
        activity,
        broadcast,
    })
}

/// Creates the enrichment worker for `state`, consulting the OpenLibrary-like
/// source before the ISBNdb-like one.
pub fn create_enricher(
    state: &AppState,
    open_library: InMemoryBookDataSource,
    isbndb: InMemoryBookDataSource,
) -> DefaultEnricher {
    BookEnricher::new(state.store.clone(), state.dispatcher.clone(), SystemClock)
        .with_source(Arc::new(open_library))
        .with_source(Arc::new(isbndb))
}
