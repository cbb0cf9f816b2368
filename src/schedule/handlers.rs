use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::{Date, OffsetDateTime};
use tracing::{info, instrument};
use uuid::Uuid;

use super::calendar::{
    build_calendar, day_status, events_for_day, grid_span, month_bounds, WEEK_START,
};
use super::dto::{
    CalendarResponse, CompleteEventRequest, CreateEventRequest, CreatedEventsResponse, DayEvents,
    DayQuery, MonthQuery, MonthlyStatsResponse,
};
use super::monthly::monthly_stats;
use super::repo;
use super::repo_types::ScheduledEvent;
use super::services::{build_events, spawn_reminders};
use crate::auth::AuthUser;
use crate::error::{bad_request, internal, not_found, ApiError, ValidationError};
use crate::state::AppState;
use crate::timefmt::{parse_month, YMD};

pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_day).post(create_event))
        .route("/events/:id", axum::routing::delete(delete_event))
        .route("/events/:id/complete", post(complete_event))
}

pub fn calendar_routes() -> Router<AppState> {
    Router::new()
        .route("/calendar", get(calendar))
        .route("/calendar/stats", get(calendar_stats))
}

/// Today's date in the configured local offset.
pub fn local_today(state: &AppState) -> Date {
    OffsetDateTime::now_utc()
        .to_offset(state.config.utc_offset)
        .date()
}

/// `YYYY-MM` query value, or the current month when absent.
pub fn resolve_month(raw: Option<&str>, today: Date) -> Result<Date, ValidationError> {
    match raw {
        None => Ok(today),
        Some(m) => parse_month(m).ok_or_else(|| ValidationError::InvalidMonth(m.to_string())),
    }
}

pub fn month_label(d: Date) -> String {
    format!("{}-{:02}", d.year(), u8::from(d.month()))
}

#[instrument(skip(state, body))]
pub async fn create_event(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<CreatedEventsResponse>), ApiError> {
    let events = build_events(body, local_today(&state)).map_err(bad_request)?;
    repo::insert_many(&state.db, user_id, &events)
        .await
        .map_err(internal)?;
    info!(%user_id, count = events.len(), "events scheduled");

    spawn_reminders(&state, &events);
    Ok((StatusCode::CREATED, Json(CreatedEventsResponse { events })))
}

#[instrument(skip(state))]
pub async fn list_day(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DayQuery>,
) -> Result<Json<DayEvents>, ApiError> {
    let date = match q.date.as_deref() {
        None => local_today(&state),
        Some(raw) => Date::parse(raw, YMD)
            .map_err(|_| (StatusCode::BAD_REQUEST, format!("invalid date {raw:?}")))?,
    };
    let events = repo::list_between(&state.db, user_id, date, date)
        .await
        .map_err(internal)?;
    let day = events_for_day(&events, date);
    let status = day_status(&day);
    Ok(Json(DayEvents {
        date,
        status,
        events: day.into_iter().cloned().collect(),
    }))
}

#[instrument(skip(state, body))]
pub async fn complete_event(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CompleteEventRequest>,
) -> Result<Json<ScheduledEvent>, ApiError> {
    let mut event = repo::find(&state.db, user_id, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("event"))?;

    event
        .complete(OffsetDateTime::now_utc(), body.actual_duration_minutes, body.notes)
        .map_err(bad_request)?;
    repo::save_completion(&state.db, user_id, &event)
        .await
        .map_err(internal)?;
    info!(%user_id, event_id = %id, "event completed");
    Ok(Json(event))
}

#[instrument(skip(state))]
pub async fn delete_event(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if repo::delete(&state.db, user_id, id).await.map_err(internal)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("event"))
    }
}

#[instrument(skip(state))]
pub async fn calendar(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<MonthQuery>,
) -> Result<Json<CalendarResponse>, ApiError> {
    let reference =
        resolve_month(q.month.as_deref(), local_today(&state)).map_err(bad_request)?;
    let (start, end) = grid_span(reference, WEEK_START);
    let grid_events = repo::list_between(&state.db, user_id, start, end)
        .await
        .map_err(internal)?;
    Ok(Json(CalendarResponse {
        month: month_label(reference),
        days: build_calendar(reference, &grid_events),
    }))
}

#[instrument(skip(state))]
pub async fn calendar_stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<MonthQuery>,
) -> Result<Json<MonthlyStatsResponse>, ApiError> {
    let reference =
        resolve_month(q.month.as_deref(), local_today(&state)).map_err(bad_request)?;
    let (first, last) = month_bounds(reference);
    let events = repo::list_between(&state.db, user_id, first, last)
        .await
        .map_err(internal)?;
    Ok(Json(MonthlyStatsResponse {
        month: month_label(reference),
        stats: monthly_stats(&events, reference),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn month_defaults_to_today() {
        assert_eq!(resolve_month(None, date!(2024 - 06 - 18)), Ok(date!(2024 - 06 - 18)));
    }

    #[test]
    fn month_parses_year_month() {
        let d = resolve_month(Some("2024-02"), date!(2024 - 06 - 18)).unwrap();
        assert_eq!(d, date!(2024 - 02 - 01));
        assert_eq!(month_label(d), "2024-02");
    }

    #[test]
    fn last_representable_month_resolves() {
        let d = resolve_month(Some("9999-12"), date!(2024 - 06 - 18)).unwrap();
        assert_eq!(grid_span(d, WEEK_START).1, Date::MAX);
        assert_eq!(month_label(d), "9999-12");
    }

    #[test]
    fn bad_month_is_rejected() {
        assert_eq!(
            resolve_month(Some("junio"), date!(2024 - 06 - 18)),
            Err(ValidationError::InvalidMonth("junio".into()))
        );
    }
}
