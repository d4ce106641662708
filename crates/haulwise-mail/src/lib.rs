//! Outbound mail transport abstraction for Haulwise.
//!
//! This crate defines the [`MailTransport`] trait — a delivery interface that
//! knows nothing about demo requests or templates. The intake service in
//! `haulwise-core` renders messages and hands them to a transport.
//!
//! Two implementations are provided:
//!
//! - [`ResendTransport`] — production transport, talks to a Resend-compatible
//!   HTTPS API with bearer-token authentication
//! - [`MemoryTransport`] — records messages in memory, for tests and local
//!   development

mod error;
mod memory;
mod resend;

use serde::Serialize;

pub use error::MailError;
pub use memory::MemoryTransport;
pub use resend::{DEFAULT_RESEND_API_URL, ResendTransport};

/// A fully rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    /// Sender, e.g. `Haulwise <demo@haulwise.io>`.
    pub from: String,
    /// One or more recipient addresses.
    pub to: Vec<String>,
    /// Plain-text subject line.
    pub subject: String,
    /// HTML body. Callers are responsible for escaping interpolated input.
    pub html: String,
    /// Optional reply-to address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// Provider-assigned identifier for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageId(pub String);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A pluggable outbound mail transport.
///
/// Each call is a single delivery attempt. Implementations must not retry on
/// their own; the caller decides whether a failure is fatal.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait MailTransport: Send + Sync + 'static {
    /// Hand one message to the provider.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Transport`] if the provider could not be reached,
    /// [`MailError::Rejected`] if it refused the message, and
    /// [`MailError::InvalidResponse`] if its answer could not be parsed.
    async fn send(&self, email: &OutboundEmail) -> Result<MessageId, MailError>;
}
