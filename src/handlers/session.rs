use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::services::intake::IntakeEngine;
use crate::state::{AppState, Session};

#[derive(Serialize)]
pub struct NewSessionResponse {
    pub session_id: Uuid,
    pub message: String,
}

/// Starts a new conversation in the intake phase.
pub async fn create_session(State(state): State<Arc<AppState>>) -> Json<NewSessionResponse> {
    let id = Uuid::new_v4();
    let engine = IntakeEngine::new(state.log.clone());

    state.sessions.lock().unwrap().insert(
        id,
        Arc::new(tokio::sync::Mutex::new(Session::Intake(engine))),
    );

    tracing::info!(session_id = %id, "session created");

    Json(NewSessionResponse {
        session_id: id,
        message: "Session created. Begin intake by staging patient fields.".to_string(),
    })
}
