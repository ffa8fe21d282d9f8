use std::sync::Arc;

use axum::{routing::get, Router};

use crate::{
    core::state::AppState,
    handlers::users::{delete_user, get_user, list_users, update_user},
};

pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_users))
        .route(
            "/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
}
