use std::sync::Arc;

use axum::{
    routing::{patch, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/appointments/book", post(handlers::book_appointment))
        .route("/appointments/{id}/forms", patch(handlers::update_forms))
        .route("/appointments/{id}/cancel", post(handlers::cancel_appointment))
        .route("/reminders/run", post(handlers::run_reminders))
        .route("/reports/admin", post(handlers::admin_report))
        .route("/inbound/reply", post(handlers::inbound_reply))
        .with_state(state)
}
