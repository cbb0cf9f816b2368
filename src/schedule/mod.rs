pub mod calendar;
mod dto;
pub mod handlers;
pub mod monthly;
mod repo;
pub mod repo_types;
mod services;

use crate::state::AppState;
use axum::Router;

pub use monthly::{monthly_stats, MonthlyStats};
pub use repo_types::EventKind;

pub(crate) use repo::list_between;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::event_routes())
        .merge(handlers::calendar_routes())
}
