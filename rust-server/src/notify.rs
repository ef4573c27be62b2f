//! Best-effort admin notification via the Mailgun HTTP API.
//!
//! Notification never influences the response already decided for the
//! submitter: every path resolves to a [`NotifyOutcome`] that the caller
//! records and moves on from.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::storage::NewContact;

/// Fixed timeout for the mail API call; the transport is never retried.
const MAIL_TIMEOUT: Duration = Duration::from_secs(10);

/// What happened to the admin notification for a stored submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// The mail API accepted the message.
    Sent,
    /// The mail sink is not configured; nothing was attempted.
    Skipped,
    /// The send was attempted and failed; the failure is logged only.
    Failed,
}

/// Capability for notifying the operator about a stored submission.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Attempt the notification. Never returns an error: failures are
    /// logged and collapsed into [`NotifyOutcome::Failed`].
    async fn notify(&self, contact: &NewContact) -> NotifyOutcome;
}

/// Mailgun-backed mailer.
///
/// Sends through `POST {api_base}/v3/{domain}/messages` with HTTP basic
/// auth. When the API key or domain is missing the mailer is considered
/// unconfigured and every call resolves to `Skipped`.
pub struct MailgunMailer {
    client: Client,
    api_base: String,
    api_key: Option<String>,
    domain: Option<String>,
    from: String,
    to: String,
}

impl MailgunMailer {
    pub fn new(
        api_base: String,
        api_key: Option<String>,
        domain: Option<String>,
        from: String,
        to: String,
    ) -> Self {
        Self {
            client: Client::new(),
            api_base,
            api_key,
            domain,
            from,
            to,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.mailgun_api_base.clone(),
            config.mailgun_api_key.clone(),
            config.mailgun_domain.clone(),
            config.mail_from.clone(),
            config.admin_email.clone(),
        )
    }
}

#[async_trait]
impl Mailer for MailgunMailer {
    async fn notify(&self, contact: &NewContact) -> NotifyOutcome {
        let (api_key, domain) = match (self.api_key.as_deref(), self.domain.as_deref()) {
            (Some(key), Some(domain)) => (key, domain),
            _ => {
                debug!("notification_skipped_unconfigured");
                return NotifyOutcome::Skipped;
            }
        };

        let url = format!(
            "{}/v3/{}/messages",
            self.api_base.trim_end_matches('/'),
            domain
        );

        let subject = format!("New contact from the holding page: {}", contact.name);
        let body = format!(
            "New contact form submission:\n\n\
             Name: {}\n\
             Email: {}\n\
             Phone: {}\n\
             Message: {}\n\
             IP: {}\n\
             Time: {}\n",
            contact.name,
            contact.email,
            contact.phone.as_deref().unwrap_or("not provided"),
            contact.message.as_deref().unwrap_or("none"),
            contact.ip_address,
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        );

        let result = self
            .client
            .post(&url)
            .basic_auth("api", Some(api_key))
            .form(&[
                ("from", self.from.as_str()),
                ("to", self.to.as_str()),
                ("subject", subject.as_str()),
                ("text", body.as_str()),
            ])
            .timeout(MAIL_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => {
                info!(to = %self.to, email = %contact.email, "notification_sent");
                NotifyOutcome::Sent
            }
            Ok(resp) => {
                error!(
                    to = %self.to,
                    status_code = resp.status().as_u16(),
                    "notification_rejected"
                );
                NotifyOutcome::Failed
            }
            Err(e) => {
                if e.is_timeout() {
                    error!(to = %self.to, error = %e, "notification_timeout");
                } else {
                    error!(to = %self.to, error = %e, "notification_send_failed");
                }
                NotifyOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> NewContact {
        NewContact {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            message: None,
            ip_address: "203.0.113.7".to_string(),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_mailer_skips_without_io() {
        let mailer = MailgunMailer::new(
            "https://api.mailgun.net".to_string(),
            None,
            None,
            "noreply@example.com".to_string(),
            "owner@example.com".to_string(),
        );

        assert_eq!(mailer.notify(&contact()).await, NotifyOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_partially_configured_mailer_skips() {
        let mailer = MailgunMailer::new(
            "https://api.mailgun.net".to_string(),
            Some("key-123".to_string()),
            None,
            "noreply@example.com".to_string(),
            "owner@example.com".to_string(),
        );

        assert_eq!(mailer.notify(&contact()).await, NotifyOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_unreachable_api_resolves_to_failed() {
        // Nothing listens on this port; the connection is refused
        // immediately and the outcome collapses to Failed.
        let mailer = MailgunMailer::new(
            "http://127.0.0.1:1".to_string(),
            Some("key-123".to_string()),
            Some("mg.example.com".to_string()),
            "noreply@example.com".to_string(),
            "owner@example.com".to_string(),
        );

        assert_eq!(mailer.notify(&contact()).await, NotifyOutcome::Failed);
    }
}
