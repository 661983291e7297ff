use std::sync::Arc;

use serde::Serialize;

use crate::models::{default_catalog, DoctorSlots, NotificationOutcome, PatientRecord};
use crate::records::RecordLog;
use crate::services::notify::NotificationDispatcher;

#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityResponse {
    pub available_appointments: Vec<DoctorSlots>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub success: bool,
    pub message: String,
    pub record: PatientRecord,
    pub notification: NotificationOutcome,
}

/// Books an appointment for one finalized intake record. The engine owns the
/// record from here on; booking layers the selection onto a new value and
/// never touches the intake phase's copy.
pub struct SchedulingEngine {
    record: PatientRecord,
    booked: Option<PatientRecord>,
    dispatcher: NotificationDispatcher,
    log: Arc<RecordLog>,
}

impl SchedulingEngine {
    pub fn new(
        record: PatientRecord,
        dispatcher: NotificationDispatcher,
        log: Arc<RecordLog>,
    ) -> Self {
        Self {
            record,
            booked: None,
            dispatcher,
            log,
        }
    }

    pub fn record(&self) -> &PatientRecord {
        &self.record
    }

    pub fn final_record(&self) -> Option<&PatientRecord> {
        self.booked.as_ref()
    }

    /// Serves the full availability catalog. The preference hint only shapes
    /// phrasing; slots are not filtered server-side.
    pub fn available_appointments(&self, preferred_time: Option<&str>) -> AvailabilityResponse {
        if let Some(pref) = preferred_time {
            tracing::info!(preferred_time = %pref, "availability query with preference");
        }

        AvailabilityResponse {
            available_appointments: default_catalog(),
            message: "Here are available appointments. Let me know which you prefer.".to_string(),
        }
    }

    /// Writes the appointment selection, appends the booked record to the
    /// log, and sends confirmations before returning. Booking reports
    /// success regardless of notification delivery; the message tells the
    /// caller whether the confirmation actually went out. Booking again
    /// overwrites the previous selection and re-logs.
    pub async fn book(&mut self, doctor: &str, appointment_time: &str) -> BookingConfirmation {
        let booked = self.record.with_appointment(doctor, appointment_time);

        if let Err(e) = self.log.append(&booked) {
            tracing::error!(error = %e, "failed to append booked record to log");
        }

        let notification = self.dispatcher.send_confirmations(&booked).await;

        let message = if notification.delivered() {
            format!("Booked with {doctor} at {appointment_time}. Confirmation sent.")
        } else {
            format!("Booked with {doctor} at {appointment_time}. Confirmation pending.")
        };

        tracing::info!(
            doctor = %doctor,
            appointment_time = %appointment_time,
            delivered = notification.delivered(),
            "appointment booked"
        );

        self.booked = Some(booked.clone());

        BookingConfirmation {
            success: true,
            message,
            record: booked,
            notification,
        }
    }
}
