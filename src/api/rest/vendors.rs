use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::vendor::{ApplicationStatus, Vendor, VendorApplication};
use crate::services::vendors::{self, ApprovalReport, NewApplication};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/vendor-applications",
            get(list_applications).post(submit_application),
        )
        .route("/vendor-applications/:id", get(get_application))
        .route("/vendor-applications/:id/approve", post(approve))
        .route("/vendor-applications/:id/reject", post(reject))
        .route("/vendors", get(list_vendors))
}

#[derive(Deserialize)]
pub struct ApplicationQuery {
    pub status: Option<ApplicationStatus>,
}

#[derive(Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

async fn list_applications(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ApplicationQuery>,
) -> Result<Json<Vec<VendorApplication>>, AppError> {
    Ok(Json(vendors::list_applications(&state, query.status).await?))
}

async fn submit_application(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewApplication>,
) -> Result<Json<VendorApplication>, AppError> {
    Ok(Json(vendors::submit_application(&state, payload).await?))
}

async fn get_application(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<VendorApplication>, AppError> {
    Ok(Json(vendors::get_application(&state, id).await?))
}

async fn approve(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApprovalReport>, AppError> {
    Ok(Json(vendors::approve_application(&state, id).await?))
}

async fn reject(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectRequest>,
) -> Result<Json<VendorApplication>, AppError> {
    Ok(Json(
        vendors::reject_application(&state, id, &payload.reason).await?,
    ))
}

async fn list_vendors(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Vendor>>, AppError> {
    Ok(Json(vendors::list_vendors(&state).await?))
}
