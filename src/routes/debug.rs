use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Check if services are working
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "checks": {}
    });

    // Check database
    match sqlx::query("SELECT 1").fetch_one(&state.db_pool).await {
        Ok(_) => {
            status["checks"]["database"] = json!("ok");
        }
        Err(e) => {
            status["checks"]["database"] = json!({"error": e.to_string()});
            status["status"] = json!("error");
        }
    }

    // Check saved place count
    match state.place_repo.count().await {
        Ok(count) => {
            status["checks"]["place_count"] = json!(count);
        }
        Err(e) => {
            status["checks"]["place_count"] = json!({"error": e.to_string()});
        }
    }

    // Segment cache
    let healthy = state.cache.health_check().await;
    let stats = state.cache.get_stats().await;
    status["checks"]["segment_cache"] = json!({
        "backend": state.cache.backend_name(),
        "healthy": healthy,
        "hits": stats.hits,
        "misses": stats.misses,
        "hit_rate": stats.hit_rate,
    });
    if !healthy {
        status["status"] = json!("degraded");
    }

    Json(status)
}
