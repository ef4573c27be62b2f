//! Pure field validation for contact submissions.
//!
//! Validation short-circuits on the first failure and returns a
//! human-readable reason that goes straight back to the browser.

use std::sync::OnceLock;

use regex::Regex;

use super::ContactForm;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$")
            .expect("email pattern compiles")
    })
}

/// A validated, normalized submission.
///
/// Name and email are trimmed, the phone is passed through untouched, and
/// the message is trimmed with empty messages collapsed to `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
}

/// Validate and normalize the submitted fields.
///
/// `max_message_chars` is the optional message cap, counted in characters
/// after trimming.
pub fn validate(
    form: &ContactForm,
    max_message_chars: Option<usize>,
) -> Result<ValidContact, String> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err("Name is required.".to_string());
    }

    let email = form.email.trim();
    if !email_pattern().is_match(email) {
        return Err("Invalid email format.".to_string());
    }

    let message = form
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string);

    if let (Some(max), Some(m)) = (max_message_chars, message.as_deref()) {
        if m.chars().count() > max {
            return Err(format!("Message must be at most {max} characters."));
        }
    }

    Ok(ValidContact {
        name: name.to_string(),
        email: email.to_string(),
        phone: form.phone.clone(),
        message,
    })
}
