use std::sync::Arc;

use axum::{routing::get, Router};

use crate::{
    core::state::AppState,
    handlers::activity_updates::{
        create_activity_updates, edit_activity_update, get_activity_update,
        list_activity_updates, report_activity_updates,
    },
};

pub fn activity_update_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_activity_updates).post(create_activity_updates))
        .route("/report", get(report_activity_updates))
        .route("/:update_id", get(get_activity_update).put(edit_activity_update))
}
