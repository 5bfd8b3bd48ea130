use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - Service banner
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let api = &state.config.api;

    Json(json!({
        "message": format!("Welcome to {}", api.project_name),
        "version": api.version,
        "endpoints": {
            "health": "/health (public)",
            "items": format!("{}/items[/:id] (protected)", api.prefix),
            "organizations": format!("{}/organizations[/:id] (protected)", api.prefix),
        }
    }))
}

/// GET /health - Liveness plus a store ping
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.health_check().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "healthy" }))),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "timestamp": chrono::Utc::now(),
                    "database": "unavailable"
                })),
            )
        }
    }
}
