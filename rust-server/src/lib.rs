//! Comingsoon - holding page with rate-limited contact intake.
//!
//! This library provides the modules behind the `comingsoon-web` binary:
//! - `web`: axum handlers for the landing page, liveness and contact endpoints
//! - `intake`: the contact submission workflow
//! - `limiter`, `storage`, `notify`: injected capabilities backing the workflow
//!
//! ## Architecture
//!
//! ```text
//! POST /api/contact → origin check → honeypot → rate limit → validation
//!                   → insert row → best-effort admin email → JSON response
//! ```

pub mod config;
pub mod intake;
pub mod limiter;
pub mod notify;
pub mod storage;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use intake::{ContactForm, ContactIntake, Outcome, SubmitError};
pub use limiter::{RateLimit, SlidingWindowLimiter};
pub use notify::{Mailer, MailgunMailer, NotifyOutcome};
pub use storage::{ContactStore, ContactSubmission, LibsqlStore, NewContact, StorageError};
pub use web::AppState;
