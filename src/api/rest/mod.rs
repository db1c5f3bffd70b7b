pub mod catalog;
pub mod notifications;
pub mod orders;
pub mod payouts;
pub mod users;
pub mod vendors;
pub mod wallets;
pub mod ws;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::error::AppError;
use crate::state::AppState;
use crate::store::TableCounts;

pub fn router(state: Arc<AppState>) -> Router {
    router_with_static(state, "static")
}

pub fn router_with_static(state: Arc<AppState>, static_dir: &str) -> Router {
    Router::new()
        .merge(orders::router())
        .merge(vendors::router())
        .merge(users::router())
        .merge(wallets::router())
        .merge(notifications::router())
        .merge(catalog::router())
        .merge(payouts::router())
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .fallback_service(ServeDir::new(static_dir))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    #[serde(flatten)]
    tables: TableCounts,
}

async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, AppError> {
    let tables = state.store.table_counts().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        tables,
    }))
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err).into_response(),
    }
}
