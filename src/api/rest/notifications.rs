use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::notification::Notification;
use crate::services::notification::{self, DispatchOutcome, NotificationRequest};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/notifications", get(list_notifications).post(send_notification))
        .route("/notifications/:id/read", patch(mark_read))
}

#[derive(Deserialize)]
pub struct NotificationQuery {
    pub user_id: Uuid,
}

/// Always 200: the outcome body says which channels went through.
async fn send_notification(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NotificationRequest>,
) -> Json<DispatchOutcome> {
    Json(state.notifier.send(payload).await)
}

async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<Vec<Notification>>, AppError> {
    Ok(Json(
        notification::list_notifications(&state, query.user_id).await?,
    ))
}

async fn mark_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, AppError> {
    Ok(Json(notification::mark_read(&state, id).await?))
}
