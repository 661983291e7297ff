pub mod catalog;
pub mod field;
pub mod outcome;
pub mod record;

pub use catalog::{default_catalog, DoctorSlots};
pub use field::{FieldKey, FieldValue, NormalizedAddress, StagedFields, REQUIRED_FIELDS};
pub use outcome::NotificationOutcome;
pub use record::PatientRecord;
