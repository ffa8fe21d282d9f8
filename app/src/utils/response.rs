use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug)]
pub enum APIError {
    BadRequest(String),
    UnAuthorized(String),
    NotFound(String),
    Validation(serde_json::Value),
    InternalServerError(String),
}

impl APIError {
    /// 422 with a single Laravel-style field message.
    pub fn validation(field: &str, message: &str) -> Self {
        Self::Validation(json!({ field: [message] }))
    }
}

impl IntoResponse for APIError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": msg })),
            )
                .into_response(),
            Self::UnAuthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": msg })),
            )
                .into_response(),
            Self::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": msg })),
            )
                .into_response(),
            Self::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "message": "The given data was invalid.",
                    "errors": errors,
                })),
            )
                .into_response(),
            Self::InternalServerError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": msg })),
            )
                .into_response(),
        }
    }
}
