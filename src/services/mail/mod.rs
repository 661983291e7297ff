pub mod sendgrid;

use async_trait::async_trait;

#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Whether the transport has the credentials it needs. Unconfigured
    /// transports are a degraded mode, not an error: the dispatcher skips
    /// sending entirely.
    fn is_configured(&self) -> bool {
        true
    }

    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()>;
}
