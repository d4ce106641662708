//! Sanitizing and validation of demo-request submissions.
//!
//! All free text is trimmed and capped before it is used anywhere. Caps are
//! counted in characters and truncation always lands on a `char` boundary.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::error::ValidationError;
use crate::model::{Attribution, DemoRequest, DemoRequestPayload};

pub const MAX_NAME_LEN: usize = 120;
pub const MAX_COMPANY_LEN: usize = 160;
pub const MAX_ROLE_LEN: usize = 120;
/// RFC 5321 path limit. Longer addresses are rejected, not truncated.
pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_META_LEN: usize = 500;
pub const MAX_IP_LEN: usize = 64;

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Trim `value` and cap it at `cap` characters. Blank input becomes `None`.
#[must_use]
pub fn clean(value: Option<&str>, cap: usize) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(cap).collect())
}

/// Basic address check: one `@`, no whitespace, a dot in the domain part.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email.chars().count() <= MAX_EMAIL_LEN
        && EMAIL_PATTERN
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(email))
}

/// Whether the honeypot field was filled in.
#[must_use]
pub fn is_spam(payload: &DemoRequestPayload) -> bool {
    payload
        .website
        .as_deref()
        .is_some_and(|w| !w.trim().is_empty())
}

impl DemoRequest {
    /// Validate a raw submission.
    ///
    /// `ip` is the caller-derived requester address and `now` becomes
    /// `created_at`. The honeypot is not checked here; see [`is_spam`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingFields`] naming every blank required
    /// field, or [`ValidationError::InvalidEmail`] if the address is malformed
    /// or too long.
    pub fn from_payload(
        payload: &DemoRequestPayload,
        ip: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let name = clean(payload.name.as_deref(), MAX_NAME_LEN);
        let company = clean(payload.company.as_deref(), MAX_COMPANY_LEN);
        let role = clean(payload.role.as_deref(), MAX_ROLE_LEN);
        // Email is checked against its own limit below, so no truncation here.
        let email = clean(payload.email.as_deref(), usize::MAX);

        let (Some(name), Some(company), Some(role), Some(email)) = (name, company, role, email)
        else {
            let fields = [
                ("name", &payload.name),
                ("company", &payload.company),
                ("role", &payload.role),
                ("email", &payload.email),
            ]
            .into_iter()
            .filter(|(_, v)| v.as_deref().is_none_or(|s| s.trim().is_empty()))
            .map(|(field, _)| field)
            .collect();
            return Err(ValidationError::MissingFields { fields });
        };

        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }

        let meta = |v: &Option<String>| clean(v.as_deref(), MAX_META_LEN);

        Ok(Self {
            name,
            company,
            role,
            email,
            created_at: now,
            attribution: Attribution {
                page_url: meta(&payload.page_url),
                referrer: meta(&payload.referrer),
                utm_source: meta(&payload.utm_source),
                utm_medium: meta(&payload.utm_medium),
                utm_campaign: meta(&payload.utm_campaign),
                utm_term: meta(&payload.utm_term),
                utm_content: meta(&payload.utm_content),
            },
            ip: clean(ip, MAX_IP_LEN),
        })
    }
}
