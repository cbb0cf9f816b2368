use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument};

use super::dto::{ProfilePatch, ProfileSummary};
use super::repo;
use super::repo_types::UserProfile;
use super::services::{normalize_patch, profile_completion};
use crate::auth::AuthUser;
use crate::error::{bad_request, internal, not_found, ApiError};
use crate::schedule::calendar::month_bounds;
use crate::schedule::handlers::{local_today, month_label};
use crate::state::AppState;
use crate::{glucose, schedule};

const SUMMARY_DAYS: u32 = 7;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).patch(patch_profile))
        .route("/profile/summary", get(profile_summary))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserProfile>, ApiError> {
    repo::find(&state.db, user_id)
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or_else(|| not_found("profile"))
}

#[instrument(skip(state, body))]
pub async fn patch_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<ProfilePatch>,
) -> Result<Json<UserProfile>, ApiError> {
    let patch = normalize_patch(body).map_err(bad_request)?;
    let profile = repo::merge(&state.db, user_id, &patch)
        .await
        .map_err(internal)?;
    info!(%user_id, "profile updated");
    Ok(Json(profile))
}

#[instrument(skip(state))]
pub async fn profile_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileSummary>, ApiError> {
    let today = local_today(&state);
    let (first, last) = month_bounds(today);

    let (profile, readings, events) = tokio::try_join!(
        repo::find(&state.db, user_id),
        glucose::list_recent(&state.db, user_id, Some(SUMMARY_DAYS)),
        schedule::list_between(&state.db, user_id, first, last),
    )
    .map_err(internal)?;

    Ok(Json(ProfileSummary {
        profile_completion: profile.as_ref().map(profile_completion).unwrap_or(0),
        glucose: glucose::summarize(&readings, Some(SUMMARY_DAYS)),
        month: month_label(today),
        events: schedule::monthly_stats(&events, today),
    }))
}
