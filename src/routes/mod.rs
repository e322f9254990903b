use crate::state::AppState;
use axum::Router;

pub mod docs;
pub mod health;
pub mod webhook;

pub fn build_router(app_state: &AppState) -> Router {
    Router::new()
        .nest("/health", health::create_router())
        .nest("/api/data", webhook::create_router())
        .with_state(app_state.clone())
        .nest("/docs", docs::create_router())
}
