//! Resend-compatible HTTPS transport.
//!
//! Sends one `POST {base_url}/emails` per message with a bearer token and a
//! JSON body. A single attempt is made per call; no client-side timeout is
//! configured, so the hosting platform's request timeout is the only bound.

use serde::Deserialize;
use tracing::debug;

use crate::{MailError, MailTransport, MessageId, OutboundEmail};

/// Default base URL of the Resend API.
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";

/// Success body returned by the provider.
#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

/// Error body returned by the provider. Resend uses `message`; some
/// compatible gateways use `error`.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
    error: Option<String>,
}

/// Mail transport backed by a Resend-compatible HTTP API.
#[derive(Clone)]
pub struct ResendTransport {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl std::fmt::Debug for ResendTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendTransport")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl ResendTransport {
    /// Create a transport for the given API key and base URL.
    ///
    /// A trailing slash on `base_url` is ignored.
    #[must_use]
    pub fn new(api_key: impl Into<String>, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: format!("{}/emails", base_url.trim_end_matches('/')),
        }
    }

    /// The full URL messages are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl MailTransport for ResendTransport {
    async fn send(&self, email: &OutboundEmail) -> Result<MessageId, MailError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await
            .map_err(|e| MailError::Transport {
                reason: e.to_string(),
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| MailError::Transport {
            reason: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            debug!(status = %status, "mail provider returned error status");
            return Err(MailError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&body),
            });
        }

        let parsed: SendResponse =
            serde_json::from_str(&body).map_err(|e| MailError::InvalidResponse {
                reason: e.to_string(),
            })?;

        Ok(MessageId(parsed.id))
    }
}

/// Extract the human-readable reason from a provider error body.
///
/// Falls back to the trimmed raw body when it is not the expected JSON shape.
fn rejection_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            message: Some(msg), ..
        })
        | Ok(ErrorResponse {
            message: None,
            error: Some(msg),
        }) => msg,
        _ => body.trim().to_owned(),
    }
}
