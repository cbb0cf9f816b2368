pub mod charts;
mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;
pub mod stats;

use crate::state::AppState;
use axum::Router;

pub use stats::{summarize, GlucoseSummary};

pub(crate) use repo::list_recent;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
