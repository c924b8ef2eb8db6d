use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: u64,
    pub first_name: String,
    pub last_name: String,
    /// Canonical `YYYY-MM-DD`. Part of the (first, last, dob) natural key.
    pub dob: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub preferred_location: String,
    #[serde(default)]
    pub insurance_carrier: String,
    #[serde(default)]
    pub member_id: String,
    #[serde(default)]
    pub group_id: String,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Partial insurance update: only non-empty fields overwrite stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsuranceUpdate {
    #[serde(default)]
    pub carrier: String,
    #[serde(default)]
    pub member_id: String,
    #[serde(default)]
    pub group_id: String,
}

impl InsuranceUpdate {
    pub fn is_empty(&self) -> bool {
        self.carrier.is_empty() && self.member_id.is_empty() && self.group_id.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewOrReturning {
    New,
    Returning,
}

impl fmt::Display for NewOrReturning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewOrReturning::New => write!(f, "new"),
            NewOrReturning::Returning => write!(f, "returning"),
        }
    }
}
