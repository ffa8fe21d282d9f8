use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::{
    core::state::AppState,
    handlers::map_repo_error,
    models::user::Model as User,
    repos::users::UsersRepo,
    utils::response::APIError,
};

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<User>>, APIError> {
    let repo = UsersRepo::new(state.database.clone());
    let users = repo.get_all().await.map_err(map_repo_error)?;

    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, APIError> {
    let repo = UsersRepo::new(state.database.clone());
    let user = repo.get(&user_id).await.map_err(map_repo_error)?;

    Ok(Json(user))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<serde_json::Value>, APIError> {
    let repo = UsersRepo::new(state.database.clone());
    let user = repo
        .update(&user_id, payload.name, payload.email, payload.department)
        .await
        .map_err(|e| {
            error!("User update failed for {}: {}", user_id, e);
            map_repo_error(e)
        })?;

    Ok(Json(json!({
        "message": "User updated successfully",
        "user": user,
    })))
}

/// Deleting a user takes their activities and those activities' updates
/// with them (schema cascade).
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, APIError> {
    let repo = UsersRepo::new(state.database.clone());
    repo.delete(&user_id).await.map_err(|e| {
        error!("User deletion failed for {}: {}", user_id, e);
        map_repo_error(e)
    })?;

    info!("Deleted user {}", user_id);
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
