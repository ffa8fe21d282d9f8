use std::sync::Arc;

use axum::{routing::get, Router};

use crate::{
    core::state::AppState,
    handlers::activities::{
        create_activities, daily_activities, get_activity, hourly_activities, list_activities,
        update_activity, weekly_activities,
    },
};

pub fn activity_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_activities).post(create_activities))
        .route("/daily", get(daily_activities))
        .route("/weekly", get(weekly_activities))
        .route("/hourly", get(hourly_activities))
        .route("/:activity_id", get(get_activity).put(update_activity))
}
