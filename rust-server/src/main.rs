//! Comingsoon web server.
//!
//! Serves the holding page, a liveness endpoint, and the contact-form
//! endpoint. Submissions are validated, rate limited per client IP,
//! persisted to libsql, and best-effort forwarded to the admin mailbox.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use comingsoon::web::{health, landing, submit_contact, AppState};
use comingsoon::{Config, ContactIntake, LibsqlStore, MailgunMailer, SlidingWindowLimiter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        database_url = %config.database_url,
        mail_configured = config.mail_configured(),
        origin_check_enabled = config.allowed_origins.is_some(),
        rate_limit_max = config.rate_limit_max,
        rate_limit_window_secs = config.rate_limit_window_secs,
        "config_loaded"
    );

    if !config.mail_configured() {
        warn!(
            "Mail sink is not configured; notifications are disabled. \
             Set MAILGUN_API_KEY and MAILGUN_DOMAIN to enable."
        );
    }

    // Open storage and make sure the schema exists
    let store = LibsqlStore::connect(
        &config.database_url,
        config.database_auth_token.as_deref().unwrap_or(""),
    )
    .await
    .context("Failed to open database")?;

    store
        .init_schema()
        .await
        .context("Failed to initialize database schema")?;

    // Wire the intake workflow with its capabilities
    let limiter = SlidingWindowLimiter::new(
        config.rate_limit_max,
        Duration::from_secs(config.rate_limit_window_secs),
    );
    let mailer = MailgunMailer::from_config(&config);

    let intake = ContactIntake::new(
        Arc::new(limiter),
        Arc::new(store),
        Arc::new(mailer),
        config.allowed_origins.clone(),
        config.max_message_chars,
    );

    let port = config.port;
    let cors = cors_layer(&config);
    let state = AppState::new(config, intake);

    // Build the router
    let app = Router::new()
        .route("/", get(landing))
        .route("/health", get(health))
        .route("/api/contact", post(submit_contact))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Browser-facing CORS policy: the configured origin list when present,
/// otherwise wide open.
fn cors_layer(config: &Config) -> CorsLayer {
    match &config.allowed_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> =
                origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(Any)
        }
        None => CorsLayer::permissive(),
    }
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
