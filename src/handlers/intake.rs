use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::PatientRecord;
use crate::services::intake::{Completion, StageResult};
use crate::services::notify::NotificationDispatcher;
use crate::services::scheduling::SchedulingEngine;
use crate::services::validators::{AddressInput, AddressVerdict, DobVerdict, PhoneVerdict};
use crate::state::{AppState, Session};

fn fetch_session(
    state: &AppState,
    id: &Uuid,
) -> Result<Arc<tokio::sync::Mutex<Session>>, AppError> {
    state
        .session(id)
        .ok_or_else(|| AppError::UnknownSession(id.to_string()))
}

#[derive(Deserialize)]
pub struct StageFieldRequest {
    pub field_name: String,
    pub field_value: String,
}

// POST /api/session/:id/intake/field
pub async fn stage_field(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<StageFieldRequest>,
) -> Result<Json<StageResult>, AppError> {
    let session = fetch_session(&state, &id)?;
    let mut session = session.lock().await;

    match &mut *session {
        Session::Intake(engine) => {
            tracing::info!(session_id = %id, field = %req.field_name, "staging field");
            Ok(Json(engine.stage_field(&req.field_name, &req.field_value)))
        }
        Session::Scheduling(_) => Err(AppError::WrongPhase(
            "intake already complete for this session".to_string(),
        )),
    }
}

#[derive(Deserialize)]
pub struct DobRequest {
    pub month: u32,
    pub day: u32,
    pub year: i32,
}

// POST /api/session/:id/intake/date-of-birth
pub async fn validate_date_of_birth(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<DobRequest>,
) -> Result<Json<DobVerdict>, AppError> {
    let session = fetch_session(&state, &id)?;
    let mut session = session.lock().await;

    match &mut *session {
        Session::Intake(engine) => Ok(Json(engine.validate_date_of_birth(
            req.month, req.day, req.year,
        ))),
        Session::Scheduling(_) => Err(AppError::WrongPhase(
            "intake already complete for this session".to_string(),
        )),
    }
}

// POST /api/session/:id/intake/address
pub async fn validate_address(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddressInput>,
) -> Result<Json<AddressVerdict>, AppError> {
    let session = fetch_session(&state, &id)?;
    let mut session = session.lock().await;

    match &mut *session {
        Session::Intake(engine) => {
            let verdict = engine.validate_address(state.lookup.as_ref(), &req).await;
            Ok(Json(verdict))
        }
        Session::Scheduling(_) => Err(AppError::WrongPhase(
            "intake already complete for this session".to_string(),
        )),
    }
}

#[derive(Deserialize)]
pub struct PhoneRequest {
    pub phone_number: String,
}

// POST /api/session/:id/intake/phone
pub async fn validate_phone(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<PhoneRequest>,
) -> Result<Json<PhoneVerdict>, AppError> {
    let session = fetch_session(&state, &id)?;
    let mut session = session.lock().await;

    match &mut *session {
        Session::Intake(engine) => Ok(Json(engine.validate_phone(&req.phone_number))),
        Session::Scheduling(_) => Err(AppError::WrongPhase(
            "intake already complete for this session".to_string(),
        )),
    }
}

#[derive(Serialize)]
pub struct CompletionResponse {
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<String>>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<PatientRecord>,
}

// POST /api/session/:id/intake/completion
//
// On the first complete check the session transitions to the scheduling
// phase, constructed with the finalized record.
pub async fn check_completion(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompletionResponse>, AppError> {
    let session = fetch_session(&state, &id)?;
    let mut session = session.lock().await;

    match &mut *session {
        Session::Intake(engine) => match engine.check_completion() {
            Completion::Incomplete { missing, message } => Ok(Json(CompletionResponse {
                complete: false,
                missing_fields: Some(missing.iter().map(|k| k.as_str().to_string()).collect()),
                message,
                record: None,
            })),
            Completion::Complete { record, message } => {
                let dispatcher = NotificationDispatcher::new(
                    state.mailer.clone(),
                    state.config.notification_recipients.clone(),
                );
                let scheduling =
                    SchedulingEngine::new(record.clone(), dispatcher, state.log.clone());
                *session = Session::Scheduling(scheduling);

                tracing::info!(session_id = %id, "intake complete, session moved to scheduling");

                Ok(Json(CompletionResponse {
                    complete: true,
                    missing_fields: None,
                    message,
                    record: Some(record),
                }))
            }
        },
        Session::Scheduling(engine) => Ok(Json(CompletionResponse {
            complete: true,
            missing_fields: None,
            message: "All information collected. Proceeding to scheduling.".to_string(),
            record: Some(engine.record().clone()),
        })),
    }
}
