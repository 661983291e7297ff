use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Intake field names. Well-known keys get their own variant; anything else
/// lands in the `Extension` bucket so drivers can send forward-compatible
/// fields without the engine rejecting them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKey {
    Name,
    DateOfBirth,
    ChiefComplaint,
    InsurancePayer,
    InsuranceId,
    HasReferral,
    ReferringPhysician,
    Address,
    Phone,
    Email,
    Extension(String),
}

/// Required fields, in the suggested collection order. Missing-field reports
/// follow this order.
pub const REQUIRED_FIELDS: [FieldKey; 8] = [
    FieldKey::Name,
    FieldKey::DateOfBirth,
    FieldKey::ChiefComplaint,
    FieldKey::InsurancePayer,
    FieldKey::InsuranceId,
    FieldKey::HasReferral,
    FieldKey::Address,
    FieldKey::Phone,
];

impl FieldKey {
    pub fn parse(s: &str) -> Self {
        match s {
            "name" => FieldKey::Name,
            "date_of_birth" => FieldKey::DateOfBirth,
            "chief_complaint" => FieldKey::ChiefComplaint,
            "insurance_payer" => FieldKey::InsurancePayer,
            "insurance_id" => FieldKey::InsuranceId,
            "has_referral" => FieldKey::HasReferral,
            "referring_physician" => FieldKey::ReferringPhysician,
            "address" => FieldKey::Address,
            "phone" => FieldKey::Phone,
            "email" => FieldKey::Email,
            other => FieldKey::Extension(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldKey::Name => "name",
            FieldKey::DateOfBirth => "date_of_birth",
            FieldKey::ChiefComplaint => "chief_complaint",
            FieldKey::InsurancePayer => "insurance_payer",
            FieldKey::InsuranceId => "insurance_id",
            FieldKey::HasReferral => "has_referral",
            FieldKey::ReferringPhysician => "referring_physician",
            FieldKey::Address => "address",
            FieldKey::Phone => "phone",
            FieldKey::Email => "email",
            FieldKey::Extension(s) => s,
        }
    }
}

/// A staged value. `has_referral` is coerced to a flag at staging time;
/// everything else is kept as the raw text the driver supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            FieldValue::Text(_) => None,
        }
    }
}

/// An address candidate produced by validation, held until the caller
/// confirms or rejects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAddress {
    pub street: String,
    pub unit: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl NormalizedAddress {
    /// Single-line form used for confirmation prompts and the committed
    /// address string.
    pub fn formatted(&self) -> String {
        let unit = self
            .unit
            .as_deref()
            .map(|u| format!(" {u}"))
            .unwrap_or_default();
        format!(
            "{}{unit}, {}, {} {}",
            self.street, self.city, self.state, self.zip_code
        )
    }
}

/// One conversation's collected-but-not-finalized fields. At most one pending
/// address candidate exists at a time; promotion or rejection clears it.
#[derive(Debug, Clone, Default)]
pub struct StagedFields {
    values: HashMap<FieldKey, FieldValue>,
    pending_address: Option<NormalizedAddress>,
}

impl StagedFields {
    pub fn stage(&mut self, key: FieldKey, value: FieldValue) {
        self.values.insert(key, value);
    }

    pub fn get(&self, key: &FieldKey) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn text(&self, key: &FieldKey) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_text())
    }

    pub fn flag(&self, key: &FieldKey) -> Option<bool> {
        self.values.get(key).and_then(|v| v.as_flag())
    }

    pub fn contains(&self, key: &FieldKey) -> bool {
        self.values.contains_key(key)
    }

    pub fn missing_required(&self) -> Vec<FieldKey> {
        REQUIRED_FIELDS
            .iter()
            .filter(|k| !self.values.contains_key(*k))
            .cloned()
            .collect()
    }

    pub fn set_pending_address(&mut self, candidate: NormalizedAddress) {
        self.pending_address = Some(candidate);
    }

    pub fn pending_address(&self) -> Option<&NormalizedAddress> {
        self.pending_address.as_ref()
    }

    pub fn take_pending_address(&mut self) -> Option<NormalizedAddress> {
        self.pending_address.take()
    }
}
