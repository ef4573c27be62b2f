//! Web server module for the holding page and contact endpoint.
//!
//! The handlers stay thin: address/header extraction and status mapping
//! live here, the submission workflow lives in [`crate::intake`].

pub mod client_ip;
pub mod handlers;

pub use client_ip::client_ip;
pub use handlers::{
    health, landing, submit_contact, AppState, ContactResponse, HealthResponse,
};
