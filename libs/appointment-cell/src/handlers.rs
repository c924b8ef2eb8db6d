use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    BookingRequest, CancelRequest, FormsUpdateRequest, InboundReply, RemindersRunRequest,
};
use crate::services::booking::BookingService;
use crate::services::lifecycle::LifecycleService;
use crate::services::reminders::ReminderService;
use crate::services::replies::ReplyService;
use crate::services::reports::ReportService;

#[axum::debug_handler]
pub async fn book_appointment(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&config);
    let appointment = service.book(request).await?;
    Ok(Json(json!({ "appointment": appointment })))
}

/// Runs the reminder scan. With a `today` in the body, scans as of 09:00
/// on that day instead of the wall clock.
#[axum::debug_handler]
pub async fn run_reminders(
    State(config): State<Arc<AppConfig>>,
    body: Option<Json<RemindersRunRequest>>,
) -> Result<Json<Value>, AppError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let service = ReminderService::new(&config).with_attachment(request.attachment);
    let logs = match request.today {
        Some(today) => service
            .run_for_day(&today)
            .await
            .map_err(|e| AppError::BadRequest(format!("Bad date {today}: {e}")))?,
        None => service.run().await,
    };
    Ok(Json(json!({ "logs": logs })))
}

#[axum::debug_handler]
pub async fn update_forms(
    State(config): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
    Json(request): Json<FormsUpdateRequest>,
) -> Result<Json<Value>, AppError> {
    let service = LifecycleService::new(&config);
    service.mark_forms_filled(&appointment_id, request.filled).await?;
    Ok(Json(json!({
        "appointment_id": appointment_id,
        "forms_filled": request.filled
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(config): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
    Json(request): Json<CancelRequest>,
) -> Result<Json<Value>, AppError> {
    let service = LifecycleService::new(&config);
    service.cancel(&appointment_id, &request.reason).await?;
    Ok(Json(json!({
        "appointment_id": appointment_id,
        "status": "cancelled",
        "cancellation_reason": request.reason
    })))
}

#[axum::debug_handler]
pub async fn admin_report(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = ReportService::new(&config);
    let (rows, path) = service
        .admin_report()
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;
    Ok(Json(json!({
        "rows": rows,
        "saved_to": path.display().to_string()
    })))
}

#[axum::debug_handler]
pub async fn inbound_reply(
    State(config): State<Arc<AppConfig>>,
    Json(reply): Json<InboundReply>,
) -> Result<Json<Value>, AppError> {
    let service = ReplyService::new(&config);
    let message = service.process(&reply.from_phone, &reply.text).await?;
    Ok(Json(json!({ "ok": true, "msg": message })))
}
