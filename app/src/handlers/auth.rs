use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::{
    core::state::AppState,
    models::user::Model as User,
    repos::users::UsersRepo,
    utils::{
        jwt::create_jwt,
        password::{hash_password, verify_password},
        response::APIError,
    },
};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), APIError> {
    let mut errors = serde_json::Map::new();

    let name = match payload.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() && name.len() <= 255 => name.to_string(),
        Some(name) if name.len() > 255 => {
            errors.insert(
                "name".to_string(),
                json!(["The name may not be greater than 255 characters."]),
            );
            String::new()
        }
        _ => {
            errors.insert("name".to_string(), json!(["The name field is required."]));
            String::new()
        }
    };

    let email = match payload.email.as_deref().map(str::trim) {
        Some(email) if email.contains('@') => email.to_string(),
        Some(_) => {
            errors.insert(
                "email".to_string(),
                json!(["The email must be a valid email address."]),
            );
            String::new()
        }
        None => {
            errors.insert("email".to_string(), json!(["The email field is required."]));
            String::new()
        }
    };

    let password = match payload.password.as_deref() {
        Some(password) if password.len() >= 6 => {
            if payload.password_confirmation.as_deref() != Some(password) {
                errors.insert(
                    "password".to_string(),
                    json!(["The password confirmation does not match."]),
                );
            }
            password.to_string()
        }
        Some(_) => {
            errors.insert(
                "password".to_string(),
                json!(["The password must be at least 6 characters."]),
            );
            String::new()
        }
        None => {
            errors.insert(
                "password".to_string(),
                json!(["The password field is required."]),
            );
            String::new()
        }
    };

    if !errors.is_empty() {
        return Err(APIError::Validation(errors.into()));
    }

    let users_repo = UsersRepo::new(state.database.clone());
    if users_repo.get_by_email(&email).await.is_ok() {
        return Err(APIError::validation(
            "email",
            "The email has already been taken.",
        ));
    }

    let password_hash = hash_password(&password).map_err(|e| {
        error!("Password hashing failed for {}: {}", email, e);
        APIError::InternalServerError("Failed to register user".to_string())
    })?;

    let user = users_repo
        .create(name, email.clone(), password_hash, payload.department)
        .await
        .map_err(|e| {
            error!("Registration failed for {}: {}", email, e);
            APIError::InternalServerError("Failed to register user".to_string())
        })?;

    let token = create_jwt(
        email,
        user.user_id.clone(),
        &state.config.jwt_secret,
        state.config.jwt_expiry_hours,
    )
    .map_err(|e| {
        error!("Failed to create JWT for {}: {}", user.user_id, e);
        APIError::InternalServerError("Failed to create session".to_string())
    })?;

    info!("Registered user {} ({})", user.name, user.user_id);
    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, APIError> {
    let email = payload
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| APIError::validation("email", "The email field is required."))?;
    let password = payload
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| APIError::validation("password", "The password field is required."))?;

    let users_repo = UsersRepo::new(state.database.clone());
    let user = users_repo
        .get_by_email(&email)
        .await
        .map_err(|_| APIError::UnAuthorized("Invalid credentials".to_string()))?;

    if !verify_password(&password, &user.password) {
        return Err(APIError::UnAuthorized("Invalid credentials".to_string()));
    }

    let token = create_jwt(
        email,
        user.user_id.clone(),
        &state.config.jwt_secret,
        state.config.jwt_expiry_hours,
    )
    .map_err(|e| {
        error!("Failed to create JWT for {}: {}", user.user_id, e);
        APIError::InternalServerError("Failed to create session".to_string())
    })?;

    info!("User logged in: {}", user.user_id);
    Ok(Json(AuthResponse { user, token }))
}

/// The JWT scheme keeps no server-side token row; the client discards its
/// token on this acknowledgement.
pub async fn logout(Extension(user): Extension<User>) -> Json<serde_json::Value> {
    info!("User logged out: {}", user.user_id);
    Json(json!({ "message": "Logged out" }))
}

pub async fn get_me(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}
