use axum::{routing::{get, post}, Router};
use crate::controllers::report_controller::{
    // Plants
    list_plants, get_plant_orientation, post_plant_report,
    // Ad-hoc
    post_report, list_directions,
};
use crate::shared_state::AppState;

/// Build the `/api/*` sub-router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/plants",                  get(list_plants))
        .route("/plants/{id}/orientation", get(get_plant_orientation))
        .route("/plants/{id}/report",      post(post_plant_report))
        .route("/report",                  post(post_report))
        .route("/directions",              get(list_directions))
        .with_state(state)
}
