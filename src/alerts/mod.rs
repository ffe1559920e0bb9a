pub mod dto;
pub mod handlers;
pub mod services;

use crate::state::AppState;
use axum::routing::get;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/daily-check",
            get(handlers::daily_check).post(handlers::daily_check),
        )
        .route("/health", get(handlers::health))
}
