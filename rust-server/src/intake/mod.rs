//! Contact submission workflow.
//!
//! ## Flow
//!
//! ```text
//! submit() → origin check → honeypot → rate limit → validation
//!          → insert row → best-effort notify
//! ```
//!
//! Origin and rate-limit rejections happen before any side effect. Storage
//! failure aborts with a server error. The notification outcome is recorded
//! but never changes the response already decided by persistence.

pub mod validation;

use std::net::IpAddr;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::limiter::RateLimit;
use crate::notify::{Mailer, NotifyOutcome};
use crate::storage::{ContactStore, NewContact, StorageError};

/// Contact form payload posted by the landing page.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Hidden decoy field; humans leave it empty.
    #[serde(default)]
    pub website: Option<String>,
}

/// Terminal outcomes that produce a success-shaped response.
#[derive(Debug)]
pub enum Outcome {
    /// Stored, with the result of the best-effort notification.
    Accepted { id: i64, notify: NotifyOutcome },
    /// Honeypot tripped: nothing stored, nothing counted, and the response
    /// must be indistinguishable from a genuine acceptance.
    HoneypotAbsorbed,
}

/// Rejections of a submission, in the order they are detected.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("origin not allowed")]
    OriginRejected,
    #[error("too many requests")]
    RateLimited,
    #[error("{0}")]
    Validation(String),
    #[error("failed to persist contact")]
    Storage(#[source] StorageError),
}

/// The submission workflow with its injected capabilities.
pub struct ContactIntake {
    limiter: Arc<dyn RateLimit>,
    store: Arc<dyn ContactStore>,
    mailer: Arc<dyn Mailer>,
    allowed_origins: Option<Vec<String>>,
    max_message_chars: Option<usize>,
}

impl ContactIntake {
    pub fn new(
        limiter: Arc<dyn RateLimit>,
        store: Arc<dyn ContactStore>,
        mailer: Arc<dyn Mailer>,
        allowed_origins: Option<Vec<String>>,
        max_message_chars: Option<usize>,
    ) -> Self {
        Self {
            limiter,
            store,
            mailer,
            allowed_origins,
            max_message_chars,
        }
    }

    /// Run one submission through the workflow.
    pub async fn submit(
        &self,
        form: &ContactForm,
        client_ip: IpAddr,
        origin: Option<&str>,
    ) -> Result<Outcome, SubmitError> {
        // Origin allow-list, only when configured. A request without an
        // Origin header passes; browsers always send one cross-origin.
        if let (Some(allowed), Some(origin)) = (self.allowed_origins.as_deref(), origin) {
            if !allowed.iter().any(|o| o == origin) {
                warn!(origin = %origin, ip = %client_ip, "origin_rejected");
                return Err(SubmitError::OriginRejected);
            }
        }

        // Bots fill the decoy field. Absorb the request without persisting
        // and without charging the rate limiter; the caller must answer
        // exactly like a success.
        if form.website.as_deref().is_some_and(|w| !w.is_empty()) {
            info!(ip = %client_ip, "honeypot_triggered");
            return Ok(Outcome::HoneypotAbsorbed);
        }

        if !self.limiter.check_and_record(client_ip).await {
            warn!(ip = %client_ip, "rate_limited");
            return Err(SubmitError::RateLimited);
        }

        let valid =
            validation::validate(form, self.max_message_chars).map_err(SubmitError::Validation)?;

        let contact = NewContact {
            name: valid.name,
            email: valid.email,
            phone: valid.phone,
            message: valid.message,
            ip_address: client_ip.to_string(),
        };

        let id = match self.store.insert(&contact).await {
            Ok(id) => id,
            Err(e) => {
                error!(error = %e, ip = %client_ip, "contact_save_failed");
                return Err(SubmitError::Storage(e));
            }
        };

        info!(id = id, email = %contact.email, ip = %client_ip, "contact_saved");

        let notify = self.mailer.notify(&contact).await;

        Ok(Outcome::Accepted { id, notify })
    }
}
