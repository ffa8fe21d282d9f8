pub mod activities;
pub mod activity_updates;
pub mod auth;
pub mod users;

use chrono::NaiveDate;

use crate::repos::RepoError;
use crate::utils::response::APIError;

pub(crate) fn map_repo_error(err: RepoError) -> APIError {
    match err {
        RepoError::NotFound(msg) => APIError::NotFound(msg),
        RepoError::UnknownActivity(_) => {
            APIError::validation("activity_id", "The selected activity_id is invalid.")
        }
        RepoError::Ident(_) => {
            APIError::InternalServerError("Failed to generate an identifier".to_string())
        }
        RepoError::Db(_) => APIError::InternalServerError("Server error".to_string()),
    }
}

/// Required `YYYY-MM-DD` request parameter.
pub(crate) fn parse_date(field: &str, value: Option<&str>) -> Result<NaiveDate, APIError> {
    let value = value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| APIError::validation(field, &format!("The {} field is required.", field)))?;

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        APIError::validation(field, &format!("The {} is not a valid date.", field))
    })
}
