//! Mail transport error types.
//!
//! Every variant carries enough context to explain a failed delivery without
//! a debugger. Credentials never appear in error messages.

/// Errors that can occur while handing an email to a transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailError {
    /// The request never produced an HTTP response (DNS, TLS, connection reset).
    #[error("mail transport failed: {reason}")]
    Transport { reason: String },

    /// The provider answered with a non-success status.
    #[error("mail provider rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The provider answered with success but the body was not understood.
    #[error("invalid response from mail provider: {reason}")]
    InvalidResponse { reason: String },
}

impl MailError {
    /// The message reported by the provider, if the provider sent one.
    ///
    /// Used by callers that want to surface the upstream reason to clients
    /// without leaking transport internals.
    #[must_use]
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}
