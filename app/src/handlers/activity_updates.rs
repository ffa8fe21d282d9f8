use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::{
    core::state::AppState,
    handlers::{map_repo_error, parse_date},
    models::{
        activity::ActivityStatus, activity_update::Model as ActivityUpdate, user::Model as User,
    },
    repos::activity_updates::{
        ActivityUpdatePatch, ActivityUpdatesRepo, DetailedActivityUpdate, NewActivityUpdate,
    },
    utils::{request::OneOrMany, response::APIError},
};

#[derive(Debug, Deserialize)]
pub struct CreateActivityUpdateRequest {
    pub activity_id: Option<String>,
    pub status: Option<ActivityStatus>,
    pub remark: Option<String>,
    pub progress: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditActivityUpdateRequest {
    pub status: Option<ActivityStatus>,
    pub remark: Option<String>,
    pub progress: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

pub async fn create_activity_updates(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(body): Json<OneOrMany<CreateActivityUpdateRequest>>,
) -> Result<(StatusCode, Json<Vec<ActivityUpdate>>), APIError> {
    let mut payloads = Vec::new();
    for item in body.into_vec() {
        let activity_id = item
            .activity_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                APIError::validation("activity_id", "The activity_id field is required.")
            })?;
        let status = item
            .status
            .ok_or_else(|| APIError::validation("status", "The status field is required."))?;

        payloads.push(NewActivityUpdate {
            activity_id,
            status,
            remark: item.remark,
            progress: item.progress,
        });
    }

    let repo = ActivityUpdatesRepo::new(state.database.clone());
    let created = repo.create_many(payloads, &user.user_id).await.map_err(|e| {
        error!(
            "Activity update creation failed for user {}: {}",
            user.user_id, e
        );
        map_repo_error(e)
    })?;

    info!(
        "User {} recorded {} activity updates",
        user.user_id,
        created.len()
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_activity_updates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DetailedActivityUpdate>>, APIError> {
    let repo = ActivityUpdatesRepo::new(state.database.clone());
    let updates = repo.get_all_detailed().await.map_err(map_repo_error)?;

    Ok(Json(updates))
}

pub async fn get_activity_update(
    State(state): State<Arc<AppState>>,
    Path(update_id): Path<String>,
) -> Result<Json<DetailedActivityUpdate>, APIError> {
    let repo = ActivityUpdatesRepo::new(state.database.clone());
    let update = repo.get_detailed(&update_id).await.map_err(map_repo_error)?;

    Ok(Json(update))
}

pub async fn edit_activity_update(
    State(state): State<Arc<AppState>>,
    Path(update_id): Path<String>,
    Json(payload): Json<EditActivityUpdateRequest>,
) -> Result<Json<ActivityUpdate>, APIError> {
    let status = payload
        .status
        .ok_or_else(|| APIError::validation("status", "The status field is required."))?;

    let repo = ActivityUpdatesRepo::new(state.database.clone());
    let updated = repo
        .update(
            &update_id,
            ActivityUpdatePatch {
                status,
                remark: payload.remark,
                progress: payload.progress,
            },
        )
        .await
        .map_err(|e| {
            error!("Activity update edit failed for {}: {}", update_id, e);
            map_repo_error(e)
        })?;

    Ok(Json(updated))
}

pub async fn report_activity_updates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<DetailedActivityUpdate>>, APIError> {
    let from = parse_date("from", query.from.as_deref())?;
    let to = parse_date("to", query.to.as_deref())?;

    if to < from {
        return Err(APIError::validation(
            "to",
            "The to must be a date after or equal to from.",
        ));
    }

    let repo = ActivityUpdatesRepo::new(state.database.clone());
    let updates = repo.report(from, to).await.map_err(map_repo_error)?;

    Ok(Json(updates))
}
