use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::state::SharedState;

pub async fn health_handler(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "upstreamConfigured": state.gateway.is_configured(),
        "trackedKeys": state.rate_limiter.tracked_keys(),
    }))
}
