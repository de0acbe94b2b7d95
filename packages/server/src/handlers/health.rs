use axum::Json;
use serde_json::{Value, json};

/// Static liveness check.
pub async fn health_check() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
