use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::config::AppConfig;
use crate::records::RecordLog;
use crate::services::geocode::AddressLookup;
use crate::services::intake::IntakeEngine;
use crate::services::mail::MailTransport;
use crate::services::scheduling::SchedulingEngine;

/// One conversation's phase. Intake transitions to scheduling exactly once,
/// when the completion check finalizes the record.
pub enum Session {
    Intake(IntakeEngine),
    Scheduling(SchedulingEngine),
}

/// Shared application state. Each session gets its own async mutex so one
/// conversation's in-flight operation (which may await external lookups or
/// mail sends) never blocks another conversation. The record log is the only
/// resource shared across sessions.
pub struct AppState {
    pub sessions: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<Session>>>>,
    pub config: AppConfig,
    pub lookup: Arc<dyn AddressLookup>,
    pub mailer: Arc<dyn MailTransport>,
    pub log: Arc<RecordLog>,
}

impl AppState {
    pub fn session(&self, id: &Uuid) -> Option<Arc<tokio::sync::Mutex<Session>>> {
        self.sessions.lock().unwrap().get(id).cloned()
    }
}
