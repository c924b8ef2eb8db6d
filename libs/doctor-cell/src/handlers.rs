use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::OpenSlotsQuery;
use crate::services::availability::AvailabilityService;
use crate::services::normalize::{ClinicDirectory, Normalizer};

/// Open slots for a doctor+location. Accepts fuzzy doctor/location text and
/// normalizes it before resolving.
#[axum::debug_handler]
pub async fn get_open_slots(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<OpenSlotsQuery>,
) -> Result<Json<Value>, AppError> {
    let directory = ClinicDirectory::default();
    let doctor = directory
        .normalize_doctor(&query.doctor)
        .ok_or_else(|| AppError::Unprocessable(format!("Doctor not recognized: {}", query.doctor)))?;
    let location = directory
        .normalize_location(&query.location)
        .ok_or_else(|| AppError::Unprocessable(format!("Location not recognized: {}", query.location)))?;

    let service = AvailabilityService::new(&config);
    let slots = service.open_slots(&doctor, &location).await;
    let total = slots.len();

    Ok(Json(json!({
        "doctor": doctor,
        "location": location,
        "open_slots": slots,
        "total": total
    })))
}
