//! Demo-request data model.
//!
//! [`DemoRequestPayload`] is the raw, untrusted form body. [`DemoRequest`] is
//! the validated value built from it by
//! [`DemoRequest::from_payload`](crate::model::DemoRequest::from_payload).
//! Neither is persisted; both live for a single HTTP call.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Raw submission from the demo-request form.
///
/// Every field is optional at this stage. Field names are accepted in
/// `snake_case` and in the `camelCase` the site's form script sends; when a
/// body carries both spellings the `snake_case` one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoRequestPayload {
    pub name: Option<String>,
    pub company: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    /// Honeypot. Rendered off-screen on the form; humans leave it blank.
    pub website: Option<String>,
    pub page_url: Option<String>,
    pub referrer: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,
}

impl DemoRequestPayload {
    /// Read a payload from a decoded JSON object.
    ///
    /// Extraction never fails. Numbers and booleans are read as their text;
    /// `null`, arrays and objects count as absent. The honeypot is the
    /// exception: any non-null value that is not a string is kept as its JSON
    /// text so it still registers as filled.
    #[must_use]
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let field = |snake: &str, camel: &str| {
            object
                .get(snake)
                .and_then(scalar_text)
                .or_else(|| object.get(camel).and_then(scalar_text))
        };
        let plain = |key: &str| object.get(key).and_then(scalar_text);

        Self {
            name: plain("name"),
            company: plain("company"),
            role: plain("role"),
            email: plain("email"),
            website: object.get("website").and_then(honeypot_text),
            page_url: field("page_url", "pageUrl"),
            referrer: plain("referrer"),
            utm_source: field("utm_source", "utmSource"),
            utm_medium: field("utm_medium", "utmMedium"),
            utm_campaign: field("utm_campaign", "utmCampaign"),
            utm_term: field("utm_term", "utmTerm"),
            utm_content: field("utm_content", "utmContent"),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn honeypot_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Attribution captured alongside a submission. Shown only to the team.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribution {
    pub page_url: Option<String>,
    pub referrer: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,
}

impl Attribution {
    /// Labelled values that are present, in display order.
    pub fn present(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("Page URL", &self.page_url),
            ("Referrer", &self.referrer),
            ("UTM source", &self.utm_source),
            ("UTM medium", &self.utm_medium),
            ("UTM campaign", &self.utm_campaign),
            ("UTM term", &self.utm_term),
            ("UTM content", &self.utm_content),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
    }
}

/// A validated demo request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoRequest {
    pub name: String,
    pub company: String,
    pub role: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub attribution: Attribution,
    /// Requester address as seen by the server (forwarded or peer).
    pub ip: Option<String>,
}
