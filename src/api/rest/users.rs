use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::profile::{Profile, Role};
use crate::services::users::{self, NewUser, Restrictions, UserFilter};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", get(get_user))
        .route("/users/:id/role", patch(update_role))
        .route("/users/:id/restrictions", patch(update_restrictions))
}

#[derive(Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Vec<Profile>>, AppError> {
    Ok(Json(users::list_users(&state, &filter).await?))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewUser>,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(users::create_user(&state, payload).await?))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(users::get_user(&state, id).await?))
}

async fn update_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(users::update_role(&state, id, payload.role).await?))
}

async fn update_restrictions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<Restrictions>,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(users::update_restrictions(&state, id, payload).await?))
}
