use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::scheduling::{AvailabilityResponse, BookingConfirmation};
use crate::state::{AppState, Session};

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub preferred_time: Option<String>,
}

// GET /api/session/:id/appointments
pub async fn available_appointments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let session = state
        .session(&id)
        .ok_or_else(|| AppError::UnknownSession(id.to_string()))?;
    let session = session.lock().await;

    match &*session {
        Session::Scheduling(engine) => Ok(Json(
            engine.available_appointments(query.preferred_time.as_deref()),
        )),
        Session::Intake(_) => Err(AppError::WrongPhase(
            "intake is not complete for this session".to_string(),
        )),
    }
}

#[derive(Deserialize)]
pub struct BookRequest {
    pub doctor: String,
    pub appointment_time: String,
}

// POST /api/session/:id/book
pub async fn book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<BookRequest>,
) -> Result<Json<BookingConfirmation>, AppError> {
    let session = state
        .session(&id)
        .ok_or_else(|| AppError::UnknownSession(id.to_string()))?;
    let mut session = session.lock().await;

    match &mut *session {
        Session::Scheduling(engine) => {
            let confirmation = engine.book(&req.doctor, &req.appointment_time).await;
            Ok(Json(confirmation))
        }
        Session::Intake(_) => Err(AppError::WrongPhase(
            "intake is not complete for this session".to_string(),
        )),
    }
}
