use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch};
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::coupon::{Coupon, CouponStatus};
use crate::models::flash_sale::{FlashSale, FlashSaleStatus};
use crate::models::review::{ProductRating, Review, ReviewStatus};
use crate::services::coupons::{self, NewCoupon};
use crate::services::flash_sales::{self, NewFlashSale};
use crate::services::reviews::{self, NewReview, ReviewFilter};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/coupons", get(list_coupons).post(create_coupon))
        .route("/coupons/code", get(generate_code))
        .route("/coupons/:id/status", patch(set_coupon_status))
        .route("/coupons/:id", delete(delete_coupon))
        .route("/flash-sales", get(list_flash_sales).post(create_flash_sale))
        .route("/flash-sales/:id/status", patch(set_flash_sale_status))
        .route("/flash-sales/:id", delete(delete_flash_sale))
        .route("/reviews", get(list_reviews).post(create_review))
        .route("/reviews/:id/status", patch(set_review_status))
        .route("/reviews/:id", delete(delete_review))
        .route("/products/:id/rating", get(product_rating))
}

#[derive(Deserialize)]
pub struct StatusRequest<S> {
    pub status: S,
}

#[derive(Serialize)]
pub struct GeneratedCode {
    pub code: String,
}

#[derive(Deserialize)]
pub struct FlashSaleQuery {
    #[serde(default)]
    pub live: bool,
}

async fn list_coupons(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Coupon>>, AppError> {
    Ok(Json(coupons::list_coupons(&state).await?))
}

async fn create_coupon(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewCoupon>,
) -> Result<Json<Coupon>, AppError> {
    Ok(Json(coupons::create_coupon(&state, payload).await?))
}

async fn generate_code() -> Json<GeneratedCode> {
    Json(GeneratedCode {
        code: coupons::generate_coupon_code(),
    })
}

async fn set_coupon_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusRequest<CouponStatus>>,
) -> Result<Json<Coupon>, AppError> {
    Ok(Json(
        coupons::set_coupon_status(&state, id, payload.status).await?,
    ))
}

async fn delete_coupon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    coupons::delete_coupon(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_flash_sales(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FlashSaleQuery>,
) -> Result<Json<Vec<FlashSale>>, AppError> {
    Ok(Json(
        flash_sales::list_flash_sales(&state, query.live).await?,
    ))
}

async fn create_flash_sale(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewFlashSale>,
) -> Result<Json<FlashSale>, AppError> {
    Ok(Json(flash_sales::create_flash_sale(&state, payload).await?))
}

async fn set_flash_sale_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusRequest<FlashSaleStatus>>,
) -> Result<Json<FlashSale>, AppError> {
    Ok(Json(
        flash_sales::set_flash_sale_status(&state, id, payload.status).await?,
    ))
}

async fn delete_flash_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    flash_sales::delete_flash_sale(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ReviewFilter>,
) -> Result<Json<Vec<Review>>, AppError> {
    Ok(Json(reviews::list_reviews(&state, &filter).await?))
}

async fn create_review(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewReview>,
) -> Result<Json<Review>, AppError> {
    Ok(Json(reviews::create_review(&state, payload).await?))
}

async fn set_review_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusRequest<ReviewStatus>>,
) -> Result<Json<Review>, AppError> {
    Ok(Json(
        reviews::set_review_status(&state, id, payload.status).await?,
    ))
}

async fn delete_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    reviews::delete_review(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn product_rating(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductRating>, AppError> {
    Ok(Json(reviews::product_rating(&state, id).await?))
}
