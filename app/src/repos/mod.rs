pub mod activities;
pub mod activity_updates;
pub mod users;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::prelude::DateTime;
use sea_orm::DbErr;
use thiserror::Error;

use crate::utils::ident::IdentError;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0}")]
    NotFound(String),

    #[error("activity {0} does not exist")]
    UnknownActivity(String),

    #[error("identifier generation failed: {0}")]
    Ident(IdentError),

    #[error(transparent)]
    Db(#[from] DbErr),
}

impl From<IdentError> for RepoError {
    fn from(err: IdentError) -> Self {
        match err {
            IdentError::Db(db_err) => RepoError::Db(db_err),
            other => RepoError::Ident(other),
        }
    }
}

pub(crate) fn now() -> DateTime {
    Utc::now().naive_utc()
}

/// Half-open `[00:00:00 of date, 00:00:00 of the next day)`.
pub(crate) fn day_bounds(date: NaiveDate) -> (DateTime, DateTime) {
    let start = date.and_time(NaiveTime::MIN);
    let end = (date + Duration::days(1)).and_time(NaiveTime::MIN);
    (start, end)
}

/// The ISO week containing `today`: Monday 00:00:00 through the following
/// Monday 00:00:00, half-open.
pub(crate) fn week_bounds(today: NaiveDate) -> (DateTime, DateTime) {
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let start = monday.and_time(NaiveTime::MIN);
    let end = (monday + Duration::days(7)).and_time(NaiveTime::MIN);
    (start, end)
}
