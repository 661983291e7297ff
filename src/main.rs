use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use frontdesk::config::AppConfig;
use frontdesk::handlers;
use frontdesk::records::RecordLog;
use frontdesk::services::geocode::nominatim::NominatimLookup;
use frontdesk::services::mail::sendgrid::SendGridMailer;
use frontdesk::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let log = Arc::new(RecordLog::new(&config.record_log_path));
    log.ensure_exists()?;

    if config.sendgrid_api_key.is_empty() {
        tracing::warn!("SENDGRID_API_KEY not set; confirmation emails will be skipped");
    }
    if config.notification_recipients.is_empty() {
        tracing::warn!("NOTIFICATION_RECIPIENTS not set; confirmation emails have no recipients");
    }

    let lookup = NominatimLookup::new(config.geocoder_url.clone(), config.geocoder_timeout_secs);
    let mailer = SendGridMailer::new(config.sendgrid_api_key.clone(), config.mail_from.clone());

    let state = Arc::new(AppState {
        sessions: Mutex::new(HashMap::new()),
        config: config.clone(),
        lookup: Arc::new(lookup),
        mailer: Arc::new(mailer),
        log,
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/session", post(handlers::session::create_session))
        .route(
            "/api/session/:id/intake/field",
            post(handlers::intake::stage_field),
        )
        .route(
            "/api/session/:id/intake/date-of-birth",
            post(handlers::intake::validate_date_of_birth),
        )
        .route(
            "/api/session/:id/intake/address",
            post(handlers::intake::validate_address),
        )
        .route(
            "/api/session/:id/intake/phone",
            post(handlers::intake::validate_phone),
        )
        .route(
            "/api/session/:id/intake/completion",
            post(handlers::intake::check_completion),
        )
        .route(
            "/api/session/:id/appointments",
            get(handlers::scheduling::available_appointments),
        )
        .route("/api/session/:id/book", post(handlers::scheduling::book))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
