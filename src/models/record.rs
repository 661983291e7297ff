use serde::{Deserialize, Serialize};

/// The finalized patient record. Built exactly once per conversation by the
/// intake engine's completion check; the scheduling engine layers the
/// appointment selection onto a new value rather than mutating the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub name: String,
    pub date_of_birth: String,
    pub chief_complaint: String,

    pub insurance_payer: String,
    pub insurance_id: String,

    pub has_referral: bool,
    pub referring_physician: Option<String>,

    pub address: String,
    pub phone: String,
    pub email: Option<String>,

    pub appointment_doctor: Option<String>,
    pub appointment_time: Option<String>,
}

impl PatientRecord {
    /// Returns a copy of this record with the appointment selection filled
    /// in. Calling this on an already-booked record overwrites the selection.
    pub fn with_appointment(&self, doctor: &str, appointment_time: &str) -> PatientRecord {
        PatientRecord {
            appointment_doctor: Some(doctor.to_string()),
            appointment_time: Some(appointment_time.to_string()),
            ..self.clone()
        }
    }
}
