//! Configuration module for environment variable parsing.
//!
//! Reads all configuration from environment variables once at startup.
//! Business logic receives this value object and never touches the
//! environment itself.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use tracing::warn;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// libsql database URL (`libsql://…`) or a local database file path
    pub database_url: String,

    /// Auth token for remote libsql databases
    pub database_auth_token: Option<String>,

    /// Mailgun API base URL
    pub mailgun_api_base: String,

    /// Mailgun API key; unset disables notifications
    pub mailgun_api_key: Option<String>,

    /// Mailgun sending domain; unset disables notifications
    pub mailgun_domain: Option<String>,

    /// Sender address on notification emails
    pub mail_from: String,

    /// Operator address that receives contact notifications
    pub admin_email: String,

    /// Maximum submissions per IP within the rate-limit window
    pub rate_limit_max: u32,

    /// Rate-limit sliding-window width in seconds
    pub rate_limit_window_secs: u64,

    /// Optional allow-list of `Origin` header values; unset disables the check
    pub allowed_origins: Option<Vec<String>>,

    /// Maximum message length in characters; `None` disables the cap
    pub max_message_chars: Option<usize>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: parse_or("PORT", 8080),

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "local.db".to_string()),

            database_auth_token: env::var("DATABASE_AUTH_TOKEN")
                .ok()
                .filter(|v| !v.trim().is_empty()),

            mailgun_api_base: env::var("MAILGUN_API_BASE")
                .unwrap_or_else(|_| "https://api.mailgun.net".to_string()),

            mailgun_api_key: env::var("MAILGUN_API_KEY")
                .ok()
                .filter(|v| !v.trim().is_empty()),

            mailgun_domain: env::var("MAILGUN_DOMAIN")
                .ok()
                .filter(|v| !v.trim().is_empty()),

            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "noreply@example.com".to_string()),

            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "owner@example.com".to_string()),

            rate_limit_max: parse_or("RATE_LIMIT_MAX", 5),

            rate_limit_window_secs: parse_or("RATE_LIMIT_WINDOW_SECS", 60),

            allowed_origins: parse_csv("ALLOWED_ORIGINS"),

            // 0 disables the cap
            max_message_chars: match parse_or("MAX_MESSAGE_CHARS", 500usize) {
                0 => None,
                n => Some(n),
            },
        }
    }

    /// Whether the mail sink has everything it needs to send.
    pub fn mail_configured(&self) -> bool {
        self.mailgun_api_key.is_some() && self.mailgun_domain.is_some()
    }
}

/// Parse an environment variable, falling back to a default on absence or
/// an unparseable value.
fn parse_or<T: FromStr + Display>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}

/// Parse a comma-separated list of strings.
fn parse_csv(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}
