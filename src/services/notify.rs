use std::sync::Arc;

use crate::models::{NotificationOutcome, PatientRecord};
use crate::services::mail::MailTransport;

/// Best-effort confirmation mailer. Every configured recipient gets one
/// attempt; individual failures are logged and do not stop the rest. The
/// booking counts as "delivered" if at least one recipient succeeded.
pub struct NotificationDispatcher {
    transport: Arc<dyn MailTransport>,
    recipients: Vec<String>,
}

impl NotificationDispatcher {
    pub fn new(transport: Arc<dyn MailTransport>, recipients: Vec<String>) -> Self {
        Self {
            transport,
            recipients,
        }
    }

    pub async fn send_confirmations(&self, record: &PatientRecord) -> NotificationOutcome {
        if !self.transport.is_configured() {
            tracing::warn!("mail transport not configured, skipping confirmation emails");
            return NotificationOutcome::skipped("mail transport not configured");
        }

        let subject = format!("Appointment Confirmation - {}", record.name);
        let body = confirmation_html(record);

        let mut succeeded = 0;
        for recipient in &self.recipients {
            match self.transport.send(recipient, &subject, &body).await {
                Ok(()) => {
                    tracing::info!(recipient = %recipient, "confirmation email sent");
                    succeeded += 1;
                }
                Err(e) => {
                    tracing::error!(recipient = %recipient, error = %e, "confirmation email failed");
                }
            }
        }

        NotificationOutcome {
            attempted: self.recipients.len(),
            succeeded,
            skipped: None,
        }
    }
}

fn confirmation_html(record: &PatientRecord) -> String {
    let mut html = format!(
        "<h2>New Appointment Scheduled</h2>\
         <h3>Patient Information:</h3>\
         <ul>\
         <li><strong>Name:</strong> {}</li>\
         <li><strong>Date of Birth:</strong> {}</li>\
         <li><strong>Phone:</strong> {}</li>\
         <li><strong>Email:</strong> {}</li>\
         <li><strong>Address:</strong> {}</li>\
         </ul>\
         <h3>Appointment Details:</h3>\
         <ul>\
         <li><strong>Doctor:</strong> {}</li>\
         <li><strong>Date/Time:</strong> {}</li>\
         <li><strong>Chief Complaint:</strong> {}</li>\
         </ul>\
         <h3>Insurance Information:</h3>\
         <ul>\
         <li><strong>Payer:</strong> {}</li>\
         <li><strong>Member ID:</strong> {}</li>\
         </ul>\
         <h3>Referral Information:</h3>\
         <ul>\
         <li><strong>Has Referral:</strong> {}</li>",
        record.name,
        record.date_of_birth,
        record.phone,
        record.email.as_deref().unwrap_or("Not provided"),
        record.address,
        record.appointment_doctor.as_deref().unwrap_or("TBD"),
        record.appointment_time.as_deref().unwrap_or("TBD"),
        record.chief_complaint,
        record.insurance_payer,
        record.insurance_id,
        if record.has_referral { "Yes" } else { "No" },
    );
    if let Some(physician) = &record.referring_physician {
        html.push_str(&format!(
            "<li><strong>Referring Physician:</strong> {physician}</li>"
        ));
    }
    html.push_str("</ul>");
    html
}
