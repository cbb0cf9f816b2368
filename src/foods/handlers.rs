use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, instrument};

use super::dto::{FoodSearch, FoodView, GlycemicLoadRequest, GlycemicLoadResponse};
use super::glycemic::glycemic_load;
use super::repo;
use crate::auth::{AuthUser, VerifiedUser};
use crate::error::{bad_request, internal, not_found, ApiError};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/foods", get(search_foods))
        .route("/foods/:code", get(get_food))
        .route("/foods/:code/glycemic-load", post(food_glycemic_load))
}

#[instrument(skip(state))]
pub async fn search_foods(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(q): Query<FoodSearch>,
) -> Result<Json<Vec<FoodView>>, ApiError> {
    let foods = repo::search(
        &state.db,
        q.q.as_deref().unwrap_or(""),
        q.with_glycemic_index,
        q.sort,
        q.limit,
        q.offset,
    )
    .await
    .map_err(internal)?;
    debug!(count = foods.len(), "food search");
    Ok(Json(foods.into_iter().map(FoodView::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_food(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(code): Path<String>,
) -> Result<Json<FoodView>, ApiError> {
    let food = repo::find(&state.db, &code)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("food"))?;
    Ok(Json(food.into()))
}

/// Only available to accounts with a verified email.
#[instrument(skip(state, body))]
pub async fn food_glycemic_load(
    State(state): State<AppState>,
    VerifiedUser(_user_id): VerifiedUser,
    Path(code): Path<String>,
    Json(body): Json<GlycemicLoadRequest>,
) -> Result<Json<GlycemicLoadResponse>, ApiError> {
    let food = repo::find(&state.db, &code)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("food"))?;
    let load = glycemic_load(&food, body.portion_g).map_err(bad_request)?;
    Ok(Json(GlycemicLoadResponse {
        code: food.code,
        name: food.name,
        glycemic_index: food.glycemic_index,
        load,
    }))
}
