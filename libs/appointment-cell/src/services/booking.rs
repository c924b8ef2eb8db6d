use anyhow::Result;
use chrono::Local;
use tracing::info;
use uuid::Uuid;

use doctor_cell::services::availability::AvailabilityService;
use doctor_cell::services::normalize::{ClinicDirectory, Normalizer};
use doctor_cell::Slot;
use notification_cell::{NotificationSink, SendRequest};
use patient_cell::{InsuranceUpdate, PatientService};
use shared_config::AppConfig;
use shared_store::TableStore;

use crate::models::{Appointment, AppointmentError, AppointmentStatus, BookingRequest};
use crate::services::templates::MessageTemplates;

const NEW_PATIENT_MINUTES: u32 = 60;
const RETURNING_PATIENT_MINUTES: u32 = 30;

/// End-to-end booking: validate, normalize, resolve the patient, take a
/// slot, persist, then send confirmations. Everything up to the persist is
/// fallible and leaves no writes behind; confirmation sends are fail-soft.
pub struct BookingService {
    config: AppConfig,
    appointments: TableStore<Appointment>,
    patients: PatientService,
    availability: AvailabilityService,
    sink: NotificationSink,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            config: config.clone(),
            appointments: TableStore::new(config.data_dir.join("appointments.json")),
            patients: PatientService::new(config),
            availability: AvailabilityService::new(config),
            sink: NotificationSink::new(config),
        }
    }

    pub async fn book(&self, request: BookingRequest) -> Result<Appointment, AppointmentError> {
        Self::validate(&request)?;

        let directory = ClinicDirectory::default();
        let doctor = directory
            .normalize_doctor(&request.doctor_name)
            .ok_or_else(|| AppointmentError::UnknownDoctor(request.doctor_name.clone()))?;
        let location = directory
            .normalize_location(&request.location)
            .ok_or_else(|| AppointmentError::UnknownLocation(request.location.clone()))?;
        let dob = directory
            .parse_dob(&request.dob)
            .ok_or_else(|| AppointmentError::InvalidDob(request.dob.clone()))?
            .format("%Y-%m-%d")
            .to_string();

        let slot = self.pick_slot(&doctor, &location, &request).await?;

        let insurance = InsuranceUpdate {
            carrier: request.carrier.clone(),
            member_id: request.member_id.clone(),
            group_id: request.group_id.clone(),
        };
        let (patient, new_or_returning) = self
            .patients
            .resolve(
                &request.first_name,
                &request.last_name,
                &dob,
                &request.email,
                &request.phone,
                &location,
                &insurance,
            )
            .await
            .map_err(|e| AppointmentError::StorageError(e.to_string()))?;

        let duration = match new_or_returning {
            patient_cell::NewOrReturning::New => NEW_PATIENT_MINUTES,
            patient_cell::NewOrReturning::Returning => RETURNING_PATIENT_MINUTES,
        };

        let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let appointment = Appointment {
            appointment_id: Uuid::new_v4().to_string()[..8].to_string(),
            patient_id: patient.patient_id,
            patient_name: patient.full_name(),
            dob,
            doctor_name: doctor,
            location,
            date: slot.date,
            time: slot.time,
            duration_minutes: duration,
            status: AppointmentStatus::Booked,
            insurance_carrier: request.carrier,
            member_id: request.member_id,
            group_id: request.group_id,
            forms_sent: true,
            forms_filled: false,
            confirmation_sent: true,
            created_at: now.clone(),
            updated_at: now,
            contact_email: request.email,
            contact_phone: request.phone,
            new_or_returning,
            cancellation_reason: String::new(),
        };

        self.appointments
            .append(appointment.clone())
            .await
            .map_err(|e| AppointmentError::StorageError(e.to_string()))?;
        self.write_snapshot(&appointment).await;

        info!(
            "Booked {} for {} with {} at {} on {} {}",
            appointment.appointment_id,
            appointment.patient_name,
            appointment.doctor_name,
            appointment.location,
            appointment.date,
            appointment.time
        );

        self.send_confirmations(&appointment).await;
        Ok(appointment)
    }

    fn validate(request: &BookingRequest) -> Result<(), AppointmentError> {
        let required: [(&'static str, &str); 7] = [
            ("first_name", &request.first_name),
            ("last_name", &request.last_name),
            ("dob", &request.dob),
            ("doctor_name", &request.doctor_name),
            ("location", &request.location),
            ("email", &request.email),
            ("phone", &request.phone),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AppointmentError::MissingField(name));
            }
        }
        Ok(())
    }

    /// Explicit slot if the request names one (and it is actually open),
    /// otherwise the first open slot in date/time order.
    async fn pick_slot(
        &self,
        doctor: &str,
        location: &str,
        request: &BookingRequest,
    ) -> Result<Slot, AppointmentError> {
        let open = self.availability.open_slots(doctor, location).await;
        if let (Some(date), Some(time)) = (&request.date, &request.time) {
            let wanted = Slot::new(date.clone(), time.clone());
            if open.contains(&wanted) {
                return Ok(wanted);
            }
            return Err(AppointmentError::SlotUnavailable {
                date: date.clone(),
                time: time.clone(),
            });
        }
        open.into_iter().next().ok_or(AppointmentError::NoAvailability)
    }

    /// Per-booking snapshot under `data/bookings/`, one JSON file per
    /// appointment. Kept alongside the table as an audit copy.
    async fn write_snapshot(&self, appointment: &Appointment) {
        let dir = self.config.data_dir.join("bookings");
        let path = dir.join(format!("{}.json", appointment.appointment_id));
        let result: Result<()> = async {
            tokio::fs::create_dir_all(&dir).await?;
            let body = serde_json::to_vec_pretty(appointment)?;
            tokio::fs::write(&path, body).await?;
            Ok(())
        }
        .await;
        if let Err(e) = result {
            tracing::warn!("[booking snapshot write failed] {}", e);
        }
    }

    async fn send_confirmations(&self, appointment: &Appointment) {
        let templates = MessageTemplates::new(&self.config.templates_dir);
        let status = "CONFIRMED";

        let email = SendRequest::email(
            appointment.contact_email.clone(),
            format!("Appointment {status}"),
            templates.email_body(appointment, status),
        )
        .with_attachment(templates.intake_form());
        self.sink.send(email).await;

        let sms = SendRequest::sms(
            appointment.contact_phone.clone(),
            templates.sms_body(appointment, status),
        );
        self.sink.send(sms).await;
    }
}
