pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use services::ReservationEngine;
use store::{PgStore, ReservationStore};

// Shared state for the whole application
pub struct AppState<S = PgStore> {
    pub engine: ReservationEngine<S>,
}

impl<S: ReservationStore> AppState<S> {
    pub fn with_store(store: S) -> Arc<Self> {
        Arc::new(Self { engine: ReservationEngine::new(store) })
    }
}

impl AppState<PgStore> {
    pub async fn new(config: &config::Config) -> anyhow::Result<Arc<Self>> {
        let db = database::Database::new(&config.database).await?;
        tracing::info!("Database connected");

        db.run_migrations().await?;

        Ok(Self::with_store(PgStore::new(&db)))
    }
}

/// Full HTTP surface: health endpoints plus the `/api` routes.
pub fn app<S: ReservationStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/", get(|| async { "Cinema reservations API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
