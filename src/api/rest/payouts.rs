use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::payout::{Payout, PayoutStatus};
use crate::services::payouts::{self, NewPayout};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/payouts", get(list_payouts).post(request_payout))
        .route("/payouts/:id/approve", post(approve))
        .route("/payouts/:id/reject", post(reject))
        .route("/payouts/:id/paid", post(mark_paid))
}

#[derive(Deserialize)]
pub struct PayoutQuery {
    pub status: Option<PayoutStatus>,
}

#[derive(Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

async fn list_payouts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PayoutQuery>,
) -> Result<Json<Vec<Payout>>, AppError> {
    Ok(Json(payouts::list_payouts(&state, query.status).await?))
}

async fn request_payout(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewPayout>,
) -> Result<Json<Payout>, AppError> {
    Ok(Json(payouts::request_payout(&state, payload).await?))
}

async fn approve(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Payout>, AppError> {
    Ok(Json(payouts::approve_payout(&state, id).await?))
}

async fn reject(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectRequest>,
) -> Result<Json<Payout>, AppError> {
    Ok(Json(payouts::reject_payout(&state, id, &payload.reason).await?))
}

async fn mark_paid(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Payout>, AppError> {
    Ok(Json(payouts::mark_payout_paid(&state, id).await?))
}
