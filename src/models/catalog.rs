use serde::{Deserialize, Serialize};

/// One doctor's open slots. The catalog is a fixed, ordered list; the
/// scheduling engine serves it as-is and leaves any preference filtering to
/// the caller's presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorSlots {
    pub doctor: String,
    pub specialty: String,
    pub times: Vec<String>,
}

pub fn default_catalog() -> Vec<DoctorSlots> {
    vec![
        DoctorSlots {
            doctor: "Dr. Sarah Smith".to_string(),
            specialty: "Family Medicine".to_string(),
            times: vec![
                "Tomorrow at 10:00 AM".to_string(),
                "Tomorrow at 2:30 PM".to_string(),
                "Thursday at 9:00 AM".to_string(),
                "Thursday at 3:00 PM".to_string(),
            ],
        },
        DoctorSlots {
            doctor: "Dr. Michael Johnson".to_string(),
            specialty: "Internal Medicine".to_string(),
            times: vec![
                "Wednesday at 11:00 AM".to_string(),
                "Wednesday at 4:00 PM".to_string(),
                "Friday at 10:30 AM".to_string(),
                "Friday at 2:00 PM".to_string(),
            ],
        },
        DoctorSlots {
            doctor: "Dr. Emily Chen".to_string(),
            specialty: "General Practice".to_string(),
            times: vec![
                "Tomorrow at 11:30 AM".to_string(),
                "Wednesday at 9:30 AM".to_string(),
                "Thursday at 1:00 PM".to_string(),
                "Friday at 4:30 PM".to_string(),
            ],
        },
    ]
}
