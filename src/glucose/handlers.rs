use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::charts::{chart_series, ChartSeries};
use super::dto::{SubmitReading, WindowQuery};
use super::repo;
use super::repo_types::GlucoseReading;
use super::stats::{summarize, GlucoseSummary};
use crate::auth::AuthUser;
use crate::error::{bad_request, internal, ApiError};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/glucose", get(list_readings).post(submit_reading))
        .route("/glucose/stats", get(reading_stats))
        .route("/glucose/charts", get(reading_charts))
}

#[instrument(skip(state, body))]
pub async fn submit_reading(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<SubmitReading>,
) -> Result<(StatusCode, Json<GlucoseReading>), ApiError> {
    let reading = body
        .into_reading(OffsetDateTime::now_utc(), state.config.utc_offset)
        .map_err(bad_request)?;
    repo::insert(&state.db, user_id, &reading)
        .await
        .map_err(internal)?;
    info!(%user_id, level = reading.level, "glucose reading stored");
    Ok((StatusCode::CREATED, Json(reading)))
}

#[instrument(skip(state))]
pub async fn list_readings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<WindowQuery>,
) -> Result<Json<Vec<GlucoseReading>>, ApiError> {
    let readings = repo::list_recent(&state.db, user_id, q.days)
        .await
        .map_err(internal)?;
    Ok(Json(readings))
}

#[instrument(skip(state))]
pub async fn reading_stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<WindowQuery>,
) -> Result<Json<GlucoseSummary>, ApiError> {
    let readings = repo::list_recent(&state.db, user_id, q.days)
        .await
        .map_err(internal)?;
    Ok(Json(summarize(&readings, q.days)))
}

#[instrument(skip(state))]
pub async fn reading_charts(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<WindowQuery>,
) -> Result<Json<ChartSeries>, ApiError> {
    let readings = repo::list_recent(&state.db, user_id, q.days)
        .await
        .map_err(internal)?;
    Ok(Json(chart_series(&readings)))
}
