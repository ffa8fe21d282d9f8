pub mod activities;
pub mod activity_updates;
pub mod auth;
pub mod users;

use std::sync::Arc;

use axum::{middleware, Router};
use tower_http::cors::CorsLayer;

use crate::{
    core::state::AppState,
    middlewares::auth::require_auth,
    routes::{
        activities::activity_routes,
        activity_updates::activity_update_routes,
        auth::{auth_routes, protected_auth_routes},
        users::user_routes,
    },
    utils::global_error_handler::global_error_handler,
};

pub fn create_routers(state: Arc<AppState>) -> Router<()> {
    let public_routes = auth_routes();

    let protected_routes = Router::new()
        .merge(protected_auth_routes())
        .nest("/activities", activity_routes())
        .nest("/activity-updates", activity_update_routes())
        .nest("/users", user_routes())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(CorsLayer::permissive())
        .fallback(global_error_handler)
        .with_state(state)
}
