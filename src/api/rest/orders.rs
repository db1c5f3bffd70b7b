use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::order::{Order, OrderStatus};
use crate::services::cart::{self, CartQuote, CartQuoteRequest};
use crate::services::orders::{self, NewOrder, OrderFilter};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/status", patch(update_status))
        .route("/orders/:id/driver", patch(assign_driver))
        .route("/cart/quote", post(quote_cart))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Deserialize)]
pub struct AssignDriverRequest {
    pub driver_id: Uuid,
}

async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(orders::list_orders(&state, &filter).await?))
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewOrder>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(orders::create_order(&state, payload).await?))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(orders::get_order(&state, id).await?))
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(
        orders::update_order_status(&state, id, payload.status).await?,
    ))
}

async fn assign_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignDriverRequest>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(
        orders::assign_driver(&state, id, payload.driver_id).await?,
    ))
}

async fn quote_cart(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CartQuoteRequest>,
) -> Result<Json<CartQuote>, AppError> {
    Ok(Json(cart::quote_cart(&state, payload).await?))
}
