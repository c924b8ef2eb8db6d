use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use appointment_cell::router::appointment_routes;
use doctor_cell::router::doctor_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic scheduling API is running!" }))
        .route("/paths", get(show_paths).with_state(state.clone()))
        .nest("/doctors", doctor_routes(state.clone()))
        .merge(appointment_routes(state.clone()))
}

/// Where this deployment reads and writes its data. Mirrors the front-desk
/// "show data folder" helper, so operators can find the tables and outbox.
async fn show_paths(State(config): State<Arc<AppConfig>>) -> Json<Value> {
    Json(json!({
        "data_dir": config.data_dir.display().to_string(),
        "outbox_dir": config.outbox_dir.display().to_string(),
        "templates_dir": config.templates_dir.display().to_string(),
    }))
}
