use std::sync::Arc;

use serde::Serialize;

use crate::models::{FieldKey, FieldValue, PatientRecord, StagedFields};
use crate::records::RecordLog;
use crate::services::geocode::AddressLookup;
use crate::services::validators::{
    self, AddressInput, AddressVerdict, DobVerdict, PhoneVerdict,
};

const AFFIRMATIVE: [&str; 5] = ["yes", "y", "true", "correct", "confirmed"];
const NEGATIVE: [&str; 4] = ["no", "n", "false", "incorrect"];

/// Outcome of staging one field.
#[derive(Debug, Clone, Serialize)]
pub struct StageResult {
    pub stored: bool,
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of a completion check. `Complete` carries the finalized record;
/// ownership of the value passes to the caller, which hands it to the
/// scheduling phase.
#[derive(Debug, Clone)]
pub enum Completion {
    Incomplete {
        missing: Vec<FieldKey>,
        message: String,
    },
    Complete {
        record: PatientRecord,
        message: String,
    },
}

/// Staged collection state machine for one conversation. Fields arrive in
/// any order; validators stage their normalized forms; the completion check
/// is the only place a record is constructed.
pub struct IntakeEngine {
    staged: StagedFields,
    log: Arc<RecordLog>,
}

impl IntakeEngine {
    pub fn new(log: Arc<RecordLog>) -> Self {
        Self {
            staged: StagedFields::default(),
            log,
        }
    }

    /// Records a raw field value. `has_referral` is coerced to a flag, and
    /// `address` doubles as the confirmation channel for a pending address
    /// candidate. Unknown field names are stored under the extension bucket
    /// rather than rejected.
    pub fn stage_field(&mut self, field_name: &str, field_value: &str) -> StageResult {
        let key = FieldKey::parse(field_name);

        match key {
            FieldKey::HasReferral => {
                let flag = matches!(
                    field_value.trim().to_lowercase().as_str(),
                    "yes" | "true" | "1"
                );
                self.staged.stage(key, FieldValue::Flag(flag));
                StageResult {
                    stored: true,
                    field: field_name.to_string(),
                    value: Some(FieldValue::Flag(flag)),
                    message: None,
                }
            }
            FieldKey::Address if self.staged.pending_address().is_some() => {
                let answer = field_value.trim().to_lowercase();
                if AFFIRMATIVE.contains(&answer.as_str()) {
                    // Caller confirmed the candidate: promote and clear it.
                    let formatted = self
                        .staged
                        .take_pending_address()
                        .map(|a| a.formatted())
                        .unwrap_or_default();
                    self.staged
                        .stage(FieldKey::Address, FieldValue::Text(formatted.clone()));
                    StageResult {
                        stored: true,
                        field: "address".to_string(),
                        value: Some(FieldValue::Text(formatted)),
                        message: None,
                    }
                } else if NEGATIVE.contains(&answer.as_str()) {
                    self.staged.take_pending_address();
                    StageResult {
                        stored: false,
                        field: "address".to_string(),
                        value: None,
                        message: Some(
                            "Please provide the correct street, city, state, and ZIP.".to_string(),
                        ),
                    }
                } else {
                    // Anything else is a literal address override.
                    self.staged.take_pending_address();
                    let literal = field_value.trim().to_string();
                    self.staged
                        .stage(FieldKey::Address, FieldValue::Text(literal.clone()));
                    StageResult {
                        stored: true,
                        field: "address".to_string(),
                        value: Some(FieldValue::Text(literal)),
                        message: None,
                    }
                }
            }
            key => {
                self.staged
                    .stage(key, FieldValue::Text(field_value.to_string()));
                StageResult {
                    stored: true,
                    field: field_name.to_string(),
                    value: Some(FieldValue::Text(field_value.to_string())),
                    message: None,
                }
            }
        }
    }

    /// Validates and, on success, stages the formatted date of birth.
    pub fn validate_date_of_birth(&mut self, month: u32, day: u32, year: i32) -> DobVerdict {
        let verdict = validators::validate_date_of_birth(month, day, year);
        if let Some(formatted) = &verdict.formatted_date {
            self.staged
                .stage(FieldKey::DateOfBirth, FieldValue::Text(formatted.clone()));
        }
        verdict
    }

    /// Validates and, on success, stages the national-format phone number.
    pub fn validate_phone(&mut self, raw: &str) -> PhoneVerdict {
        let verdict = validators::validate_phone(raw);
        if let Some(formatted) = &verdict.formatted_phone {
            self.staged
                .stage(FieldKey::Phone, FieldValue::Text(formatted.clone()));
        }
        verdict
    }

    /// Normalizes an address and stages it as the pending candidate awaiting
    /// confirmation via `stage_field("address", "yes"/"no")`.
    pub async fn validate_address(
        &mut self,
        lookup: &dyn AddressLookup,
        input: &AddressInput,
    ) -> AddressVerdict {
        let verdict = validators::validate_address(lookup, input).await;
        self.staged.set_pending_address(verdict.normalized.clone());
        verdict
    }

    /// Reports missing required fields, or finalizes the record and appends
    /// it to the log. Repeated calls after completion re-finalize from the
    /// same staged state.
    pub fn check_completion(&mut self) -> Completion {
        let missing = self.staged.missing_required();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|k| k.as_str()).collect();
            return Completion::Incomplete {
                message: format!("I still need to collect: {}", names.join(", ")),
                missing,
            };
        }

        let record = self.build_record();

        if let Err(e) = self.log.append(&record) {
            // Log loss is the one fatal-ish condition; the in-memory
            // workflow continues regardless.
            tracing::error!(error = %e, "failed to append finalized record to log");
        }

        tracing::info!(name = %record.name, dob = %record.date_of_birth, "patient intake completed");

        Completion::Complete {
            record,
            message: "All information collected. Proceeding to scheduling.".to_string(),
        }
    }

    fn build_record(&self) -> PatientRecord {
        let text = |key: &FieldKey| -> String {
            self.staged.text(key).unwrap_or_default().to_string()
        };
        let optional = |key: &FieldKey| -> Option<String> {
            self.staged
                .text(key)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        PatientRecord {
            name: text(&FieldKey::Name),
            date_of_birth: text(&FieldKey::DateOfBirth),
            chief_complaint: text(&FieldKey::ChiefComplaint),
            insurance_payer: text(&FieldKey::InsurancePayer),
            insurance_id: text(&FieldKey::InsuranceId),
            has_referral: self.staged.flag(&FieldKey::HasReferral).unwrap_or(false),
            referring_physician: optional(&FieldKey::ReferringPhysician),
            address: text(&FieldKey::Address),
            phone: text(&FieldKey::Phone),
            email: optional(&FieldKey::Email),
            appointment_doctor: None,
            appointment_time: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn staged(&self) -> &StagedFields {
        &self.staged
    }
}
