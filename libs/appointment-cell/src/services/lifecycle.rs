use chrono::Local;
use tracing::info;

use shared_config::AppConfig;
use shared_store::TableStore;

use crate::models::{Appointment, AppointmentError, AppointmentStatus};

/// Front-desk lifecycle operations on a booked appointment.
pub struct LifecycleService {
    appointments: TableStore<Appointment>,
}

impl LifecycleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            appointments: TableStore::new(config.data_dir.join("appointments.json")),
        }
    }

    pub async fn mark_forms_filled(
        &self,
        appointment_id: &str,
        filled: bool,
    ) -> Result<(), AppointmentError> {
        let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let updated = self
            .appointments
            .update_where(
                |a| a.appointment_id == appointment_id,
                |a| {
                    a.forms_filled = filled;
                    a.updated_at = now.clone();
                },
            )
            .await
            .map_err(|e| AppointmentError::StorageError(e.to_string()))?;
        if updated == 0 {
            return Err(AppointmentError::NotFound);
        }
        info!("Updated forms_filled={} for {}", filled, appointment_id);
        Ok(())
    }

    pub async fn cancel(&self, appointment_id: &str, reason: &str) -> Result<(), AppointmentError> {
        let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let updated = self
            .appointments
            .update_where(
                |a| a.appointment_id == appointment_id,
                |a| {
                    a.status = AppointmentStatus::Cancelled;
                    a.cancellation_reason = reason.to_string();
                    a.updated_at = now.clone();
                },
            )
            .await
            .map_err(|e| AppointmentError::StorageError(e.to_string()))?;
        if updated == 0 {
            return Err(AppointmentError::NotFound);
        }
        info!("Cancelled {} (reason: {})", appointment_id, reason);
        Ok(())
    }

    pub async fn get(&self, appointment_id: &str) -> Option<Appointment> {
        self.appointments
            .get_all()
            .await
            .into_iter()
            .find(|a| a.appointment_id == appointment_id)
    }
}
