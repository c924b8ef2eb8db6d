use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use patient_cell::NewOrReturning;
use shared_config::AppConfig;
use shared_store::TableStore;

use crate::models::{Appointment, AppointmentStatus};

/// One row of the admin report: the operational projection of an
/// appointment, without contact details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminReportRow {
    pub appointment_id: String,
    pub patient_name: String,
    pub doctor_name: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub new_or_returning: NewOrReturning,
    pub status: AppointmentStatus,
    pub forms_filled: bool,
    pub insurance_carrier: String,
    pub member_id: String,
    pub group_id: String,
}

impl From<&Appointment> for AdminReportRow {
    fn from(a: &Appointment) -> Self {
        Self {
            appointment_id: a.appointment_id.clone(),
            patient_name: a.patient_name.clone(),
            doctor_name: a.doctor_name.clone(),
            location: a.location.clone(),
            date: a.date.clone(),
            time: a.time.clone(),
            new_or_returning: a.new_or_returning,
            status: a.status,
            forms_filled: a.forms_filled,
            insurance_carrier: a.insurance_carrier.clone(),
            member_id: a.member_id.clone(),
            group_id: a.group_id.clone(),
        }
    }
}

pub struct ReportService {
    appointments: TableStore<Appointment>,
    out_path: PathBuf,
}

impl ReportService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            appointments: TableStore::new(config.data_dir.join("appointments.json")),
            out_path: config.data_dir.join("admin_report.json"),
        }
    }

    /// Project every appointment into report rows and write the report file.
    /// Returns the rows plus where the file landed.
    pub async fn admin_report(&self) -> Result<(Vec<AdminReportRow>, PathBuf)> {
        let rows: Vec<AdminReportRow> = self
            .appointments
            .get_all()
            .await
            .iter()
            .map(AdminReportRow::from)
            .collect();

        if let Some(parent) = self.out_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.out_path, serde_json::to_vec_pretty(&rows)?).await?;
        info!("Admin report saved to: {}", self.out_path.display());
        Ok((rows, self.out_path.clone()))
    }
}
