use crate::error::Result;
use crate::models::{PlanOutcome, PlanRequest};
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// POST /routes/plan
/// Plan the shortest visiting order through saved places
pub async fn plan_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PlanOutcome>> {
    tracing::info!(
        keyword = request.start_keyword.as_deref().unwrap_or(""),
        has_start_point = request.start_point.is_some(),
        visit_count = request.visit_count,
        strategy = %request.strategy,
        "Plan request: {} stops, strategy={}",
        request.visit_count,
        request.strategy
    );

    // Dropping this future (client disconnect) aborts outstanding evaluations.
    let outcome = state.planner.plan(&request).await?;

    Ok(Json(outcome))
}
