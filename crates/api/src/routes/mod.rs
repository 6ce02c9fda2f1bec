pub mod analytics;
pub mod health;

use axum::Router;

use crate::middleware::cors::cors;
use crate::state::AppState;

/// Build the complete API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(analytics::router(&state.producers))
        .layer(axum::middleware::from_fn(cors))
        .with_state(state)
}
