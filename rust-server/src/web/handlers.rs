//! HTTP endpoint handlers.
//!
//! Three routes: the static landing page, a liveness probe, and the
//! contact-form endpoint. The contact handler extracts the client address
//! and `Origin` header, hands the payload to the intake workflow, and maps
//! its outcome onto HTTP statuses. Storage failures surface as a generic
//! retry message; the logged detail stays server-side.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::intake::{ContactForm, ContactIntake, Outcome, SubmitError};
use crate::web::client_ip::client_ip;
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub intake: Arc<ContactIntake>,
}

impl AppState {
    pub fn new(config: Config, intake: ContactIntake) -> Self {
        Self {
            config: Arc::new(config),
            intake: Arc::new(intake),
        }
    }
}

// =============================================================================
// Landing Page
// =============================================================================

const LANDING_PAGE: &str = include_str!("../../assets/index.html");

/// Serve the embedded holding page.
pub async fn landing() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "comingsoon-web",
    })
}

// =============================================================================
// Contact Form
// =============================================================================

const THANK_YOU: &str = "Thank you! We'll be in touch.";

/// Contact endpoint response.
///
/// Success carries `message`, rejections carry `detail`; the absent field
/// is omitted from the JSON entirely.
#[derive(Serialize)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ContactResponse {
    fn accepted() -> Self {
        Self {
            success: true,
            message: Some(THANK_YOU),
            detail: None,
        }
    }

    fn rejected(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            detail: Some(detail.into()),
        }
    }
}

/// Contact form endpoint.
pub async fn submit_contact(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(form): Json<ContactForm>,
) -> impl IntoResponse {
    let ip = client_ip(&headers, peer);
    let origin = headers.get(header::ORIGIN).and_then(|v| v.to_str().ok());

    info!(ip = %ip, origin = ?origin, "contact_received");

    match state.intake.submit(&form, ip, origin).await {
        Ok(Outcome::Accepted { id, notify }) => {
            info!(id = id, notify = ?notify, "contact_accepted");
            (StatusCode::OK, Json(ContactResponse::accepted()))
        }
        // Same status and body as a genuine acceptance.
        Ok(Outcome::HoneypotAbsorbed) => (StatusCode::OK, Json(ContactResponse::accepted())),
        Err(SubmitError::OriginRejected) => (
            StatusCode::FORBIDDEN,
            Json(ContactResponse::rejected("Access denied.")),
        ),
        Err(SubmitError::RateLimited) => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ContactResponse::rejected(
                "Too many requests. Please try again in a moment.",
            )),
        ),
        Err(SubmitError::Validation(reason)) => {
            (StatusCode::BAD_REQUEST, Json(ContactResponse::rejected(reason)))
        }
        Err(SubmitError::Storage(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ContactResponse::rejected(
                "Failed to save your message. Please try again.",
            )),
        ),
    }
}
