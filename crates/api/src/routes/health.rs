//! Health check endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use rugscope_common::config::AnalyticsMode;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mode = match state.mode {
        AnalyticsMode::Sample => "sample",
        AnalyticsMode::Live => "live",
    };

    Json(json!({
        "status": "ok",
        "service": "rugscope-api",
        "version": env!("CARGO_PKG_VERSION"),
        "mode": mode
    }))
}
