use anyhow::Context;
use async_trait::async_trait;

use super::MailTransport;

const SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

pub struct SendGridMailer {
    api_key: String,
    from_email: String,
    client: reqwest::Client,
}

impl SendGridMailer {
    pub fn new(api_key: String, from_email: String) -> Self {
        Self {
            api_key,
            from_email,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MailTransport for SendGridMailer {
    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()> {
        let payload = serde_json::json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": self.from_email },
            "subject": subject,
            "content": [{ "type": "text/html", "value": html_body }],
        });

        self.client
            .post(SEND_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("failed to reach SendGrid")?
            .error_for_status()
            .context("SendGrid API returned error")?;

        Ok(())
    }
}
