use anyhow::Result;
use tracing::info;

use shared_config::AppConfig;
use shared_store::TableStore;

use crate::models::{InsuranceUpdate, NewOrReturning, Patient};

/// Patient identity and record keeping over the `patients.json` table.
///
/// Identity is the natural key (first name, last name, date of birth),
/// compared case-insensitively on the names and exactly on the canonical
/// `YYYY-MM-DD` date string.
pub struct PatientService {
    store: TableStore<Patient>,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: TableStore::new(config.data_dir.join("patients.json")),
        }
    }

    /// Look up an existing patient by the natural key.
    pub async fn find(&self, first_name: &str, last_name: &str, dob: &str) -> Option<Patient> {
        self.store
            .get_all()
            .await
            .into_iter()
            .find(|p| Self::matches(p, first_name, last_name, dob))
    }

    /// Resolve a patient to a stored record, creating one if the natural key
    /// is unknown. Returning patients keep their id; contact details from the
    /// request refresh the stored record, and the insurance update merges
    /// field by field (empty fields never overwrite known values). One table
    /// write either way. Returns the record and whether the patient was new
    /// or returning.
    pub async fn resolve(
        &self,
        first_name: &str,
        last_name: &str,
        dob: &str,
        email: &str,
        phone: &str,
        preferred_location: &str,
        insurance: &InsuranceUpdate,
    ) -> Result<(Patient, NewOrReturning)> {
        let mut rows = self.store.get_all().await;

        if let Some(existing) = rows
            .iter_mut()
            .find(|p| Self::matches(p, first_name, last_name, dob))
        {
            if !email.is_empty() {
                existing.email = email.to_string();
            }
            if !phone.is_empty() {
                existing.phone = phone.to_string();
            }
            if !preferred_location.is_empty() {
                existing.preferred_location = preferred_location.to_string();
            }
            Self::merge_insurance(existing, insurance);
            let patient = existing.clone();
            self.store.replace_all(&rows).await?;
            info!("Returning patient {} ({})", patient.full_name(), patient.patient_id);
            return Ok((patient, NewOrReturning::Returning));
        }

        let patient_id = rows.iter().map(|p| p.patient_id).max().unwrap_or(0) + 1;
        let patient = Patient {
            patient_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            dob: dob.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            preferred_location: preferred_location.to_string(),
            insurance_carrier: insurance.carrier.clone(),
            member_id: insurance.member_id.clone(),
            group_id: insurance.group_id.clone(),
        };
        rows.push(patient.clone());
        self.store.replace_all(&rows).await?;
        info!("New patient {} ({})", patient.full_name(), patient.patient_id);
        Ok((patient, NewOrReturning::New))
    }

    pub async fn get(&self, patient_id: u64) -> Option<Patient> {
        self.store
            .get_all()
            .await
            .into_iter()
            .find(|p| p.patient_id == patient_id)
    }

    fn merge_insurance(patient: &mut Patient, update: &InsuranceUpdate) {
        if !update.carrier.is_empty() {
            patient.insurance_carrier = update.carrier.clone();
        }
        if !update.member_id.is_empty() {
            patient.member_id = update.member_id.clone();
        }
        if !update.group_id.is_empty() {
            patient.group_id = update.group_id.clone();
        }
    }

    fn matches(patient: &Patient, first_name: &str, last_name: &str, dob: &str) -> bool {
        patient.first_name.eq_ignore_ascii_case(first_name.trim())
            && patient.last_name.eq_ignore_ascii_case(last_name.trim())
            && patient.dob == dob
    }
}
