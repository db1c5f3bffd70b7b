use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::wallet::{Wallet, WalletLogEntry};
use crate::services::wallet::{self, WalletAdjustment};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/wallets/:user_id", get(get_wallet))
        .route("/wallets/:user_id/adjustments", post(adjust_wallet))
        .route("/wallets/:user_id/logs", get(list_logs))
}

async fn get_wallet(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Wallet>, AppError> {
    Ok(Json(wallet::get_wallet(&state, user_id).await?))
}

async fn adjust_wallet(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<WalletAdjustment>,
) -> Result<Json<Wallet>, AppError> {
    Ok(Json(wallet::adjust_wallet(&state, user_id, payload).await?))
}

async fn list_logs(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<WalletLogEntry>>, AppError> {
    Ok(Json(wallet::list_wallet_logs(&state, user_id).await?))
}
