use axum::Json;
use serde_json::{json, Value};

/// Reachable only past the auth gate, so reaching it is the answer.
pub async fn check() -> Json<Value> {
    Json(json!({ "status": "admin_verified" }))
}
