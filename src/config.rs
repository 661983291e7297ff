use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub record_log_path: String,
    pub geocoder_url: String,
    pub geocoder_timeout_secs: u64,
    pub sendgrid_api_key: String,
    pub mail_from: String,
    pub notification_recipients: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            record_log_path: env::var("RECORD_LOG_PATH")
                .unwrap_or_else(|_| "patient_records.json".to_string()),
            geocoder_url: env::var("GEOCODER_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            geocoder_timeout_secs: env::var("GEOCODER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            sendgrid_api_key: env::var("SENDGRID_API_KEY").unwrap_or_default(),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "scheduling@bayareahealth.example".to_string()),
            notification_recipients: parse_recipients(
                &env::var("NOTIFICATION_RECIPIENTS").unwrap_or_default(),
            ),
        }
    }
}

fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
