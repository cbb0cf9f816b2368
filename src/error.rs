use axum::http::StatusCode;
use thiserror::Error;
use tracing::error;

/// Input rejected by a domain rule.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("glucose level must not be negative (got {0})")]
    NegativeGlucose(i32),
    #[error("portion size must be greater than zero")]
    NonPositivePortion,
    #[error("food {0} has no glycemic index")]
    MissingGlycemicIndex(String),
    #[error("event date {0} is before today")]
    EventInPast(time::Date),
    #[error("repeat interval must be at least one hour")]
    ZeroRepeatInterval,
    #[error("repeat end is before the first occurrence")]
    RepeatEndsBeforeStart,
    #[error("repeat would create more than {0} events")]
    TooManyOccurrences(usize),
    #[error("actual duration only applies to exercise events")]
    DurationOnMedication,
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("invalid month {0:?}, expected YYYY-MM")]
    InvalidMonth(String),
}

pub type ApiError = (StatusCode, String);

pub fn bad_request(e: ValidationError) -> ApiError {
    (StatusCode::BAD_REQUEST, e.to_string())
}

pub fn internal(e: anyhow::Error) -> ApiError {
    error!(error = %e, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
}

pub fn not_found(what: &str) -> ApiError {
    (StatusCode::NOT_FOUND, format!("{what} not found"))
}
