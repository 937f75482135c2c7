use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and AI mode.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let ai_mode = match state.config.ai.mode {
        crate::config::AiMode::Offline => "offline",
        crate::config::AiMode::Live { .. } => "live",
    };
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "hireflow-api",
        "ai_mode": ai_mode
    }))
}
