use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Aggregate result of one notification dispatch. Delivery is best-effort:
/// one successful recipient out of the whole list counts as delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationOutcome {
    pub attempted: usize,
    pub succeeded: usize,
    /// Reason the dispatch was skipped without attempting any send
    /// (e.g. missing transport credential).
    pub skipped: Option<String>,
}

impl NotificationOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            attempted: 0,
            succeeded: 0,
            skipped: Some(reason.into()),
        }
    }

    pub fn delivered(&self) -> bool {
        self.succeeded > 0
    }

    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.attempted as f64
        }
    }
}

// The wire form carries the derived aggregate alongside the raw counts.
impl Serialize for NotificationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("NotificationOutcome", 5)?;
        s.serialize_field("attempted", &self.attempted)?;
        s.serialize_field("succeeded", &self.succeeded)?;
        s.serialize_field("success_rate", &self.success_rate())?;
        s.serialize_field("delivered", &self.delivered())?;
        s.serialize_field("skipped", &self.skipped)?;
        s.end()
    }
}
