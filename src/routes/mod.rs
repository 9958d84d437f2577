pub mod debug;
pub mod places;
pub mod plan;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/routes/plan", post(plan::plan_route))
        .route(
            "/places",
            get(places::list_places)
                .post(places::create_place)
                .delete(places::delete_all_places),
        )
        .route("/places/search", get(places::search_places))
        .route("/places/from-search", post(places::save_search_result))
        .route("/places/{id}", delete(places::delete_place))
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}
