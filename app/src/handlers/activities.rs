use std::collections::BTreeMap;
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
    models::{activity::ActivityStatus, activity::Model as Activity, user::Model as User},
    repos::{
        activities::{ActivitiesRepo, ActivityPatch, DetailedActivity, NewActivity},
        activity_updates::{ActivityUpdatesRepo, DetailedActivityUpdate},
    },
    utils::{request::OneOrMany, response::APIError},
};

#[derive(Debug, Deserialize)]
pub struct CreateActivityRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateActivityRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ActivityStatus>,
    pub remark: Option<String>,
    pub progress: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

fn validate_title(title: Option<String>) -> Result<String, APIError> {
    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| APIError::validation("title", "The title field is required."))?;

    if title.len() > 255 {
        return Err(APIError::validation(
            "title",
            "The title may not be greater than 255 characters.",
        ));
    }

    Ok(title)
}

pub async fn create_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(body): Json<OneOrMany<CreateActivityRequest>>,
) -> Result<(StatusCode, Json<Vec<Activity>>), APIError> {
    let mut payloads = Vec::new();
    for item in body.into_vec() {
        payloads.push(NewActivity {
            title: validate_title(item.title)?,
            description: item.description,
        });
    }

    let repo = ActivitiesRepo::new(state.database.clone());
    let created = repo.create_many(payloads, &user.user_id).await.map_err(|e| {
        error!("Activity creation failed for user {}: {}", user.user_id, e);
        map_repo_error(e)
    })?;

    info!("User {} created {} activities", user.user_id, created.len());
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_activities(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DetailedActivity>>, APIError> {
    let repo = ActivitiesRepo::new(state.database.clone());
    let activities = repo.get_all_detailed().await.map_err(map_repo_error)?;

    Ok(Json(activities))
}

pub async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(activity_id): Path<String>,
) -> Result<Json<DetailedActivity>, APIError> {
    let repo = ActivitiesRepo::new(state.database.clone());
    let activity = repo
        .get_detailed(&activity_id)
        .await
        .map_err(map_repo_error)?;

    Ok(Json(activity))
}

pub async fn update_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(activity_id): Path<String>,
    Json(payload): Json<UpdateActivityRequest>,
) -> Result<Json<Activity>, APIError> {
    let title = match payload.title {
        Some(title) => Some(validate_title(Some(title))?),
        None => None,
    };

    let patch = ActivityPatch {
        title,
        description: payload.description,
        status: payload.status,
        remark: payload.remark,
        progress: payload.progress,
    };

    let repo = ActivitiesRepo::new(state.database.clone());
    let updated = repo
        .update(&activity_id, patch, &user.user_id)
        .await
        .map_err(|e| {
            error!("Activity update failed for {}: {}", activity_id, e);
            map_repo_error(e)
        })?;

    Ok(Json(updated))
}

pub async fn daily_activities(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<DetailedActivity>>, APIError> {
    let date = parse_date("date", query.date.as_deref())?;

    let repo = ActivitiesRepo::new(state.database.clone());
    let activities = repo.daily(date).await.map_err(map_repo_error)?;

    Ok(Json(activities))
}

pub async fn weekly_activities(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, Vec<DetailedActivity>>>, APIError> {
    let repo = ActivitiesRepo::new(state.database.clone());
    let activities = repo.weekly().await.map_err(map_repo_error)?;

    Ok(Json(group_by_date(activities)))
}

pub async fn hourly_activities(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<BTreeMap<String, Vec<DetailedActivityUpdate>>>, APIError> {
    let date = parse_date("date", query.date.as_deref())?;

    let repo = ActivityUpdatesRepo::new(state.database.clone());
    let updates = repo.hourly(date).await.map_err(map_repo_error)?;

    Ok(Json(group_by_hour(updates)))
}

/// Bucket activities by their creation date, `YYYY-MM-DD`.
fn group_by_date(activities: Vec<DetailedActivity>) -> BTreeMap<String, Vec<DetailedActivity>> {
    let mut grouped: BTreeMap<String, Vec<DetailedActivity>> = BTreeMap::new();
    for detailed in activities {
        let key = detailed.activity.created_at.format("%Y-%m-%d").to_string();
        grouped.entry(key).or_default().push(detailed);
    }
    grouped
}

/// Bucket updates by their creation hour, zero-padded `00`-`23`.
fn group_by_hour(
    updates: Vec<DetailedActivityUpdate>,
) -> BTreeMap<String, Vec<DetailedActivityUpdate>> {
    let mut grouped: BTreeMap<String, Vec<DetailedActivityUpdate>> = BTreeMap::new();
    for detailed in updates {
        let key = detailed.update.created_at.format("%H").to_string();
        grouped.entry(key).or_default().push(detailed);
    }
    grouped
}
